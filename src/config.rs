use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub smtp: SmtpConfig,
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    /// bcrypt哈希（$2开头）或明文密码
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_cloudinary_base_url")]
    pub base_url: String,
}

fn default_cloudinary_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    /// 新订单通知收件人，为空时跳过通知
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    admin: AdminConfig {
                        email: get_env("ADMIN_EMAIL").unwrap_or_default(),
                        password: get_env("ADMIN_PASSWORD").unwrap_or_default(),
                    },
                    smtp: SmtpConfig {
                        host: get_env("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                        username: get_env("EMAIL_USER").unwrap_or_default(),
                        password: get_env("EMAIL_PASS").unwrap_or_default(),
                        from_address: get_env("EMAIL_FROM")
                            .or_else(|| get_env("EMAIL_USER"))
                            .unwrap_or_default(),
                    },
                    cloudinary: CloudinaryConfig {
                        cloud_name: get_env("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                        api_key: get_env("CLOUDINARY_API_KEY").unwrap_or_default(),
                        api_secret: get_env("CLOUDINARY_API_SECRET").unwrap_or_default(),
                        base_url: get_env("CLOUDINARY_BASE_URL")
                            .unwrap_or_else(default_cloudinary_base_url),
                    },
                    notification: NotificationConfig {
                        admin_emails: get_env("ADMIN_EMAILS")
                            .map(split_email_list)
                            .unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            config.admin.email = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            config.admin.password = v;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            config.smtp.host = v;
        }
        if let Ok(v) = env::var("EMAIL_USER") {
            config.smtp.username = v;
        }
        if let Ok(v) = env::var("EMAIL_PASS") {
            config.smtp.password = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM") {
            config.smtp.from_address = v;
        }
        if config.smtp.from_address.is_empty() {
            config.smtp.from_address = config.smtp.username.clone();
        }
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            config.cloudinary.cloud_name = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_KEY") {
            config.cloudinary.api_key = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_SECRET") {
            config.cloudinary.api_secret = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_BASE_URL") {
            config.cloudinary.base_url = v;
        }
        if let Ok(v) = env::var("ADMIN_EMAILS") {
            config.notification.admin_emails = split_email_list(v);
        }

        Ok(config)
    }
}

fn split_email_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_email_list() {
        let list = split_email_list("a@x.com, b@x.com,,c@x.com ".to_string());
        assert_eq!(list, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_split_email_list_empty() {
        assert!(split_email_list(String::new()).is_empty());
    }
}
