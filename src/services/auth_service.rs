use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest};
use crate::utils::{JwtService, verify_password};

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    admin: AdminConfig,
}

impl AuthService {
    pub fn new(jwt_service: JwtService, admin: AdminConfig) -> Self {
        Self { jwt_service, admin }
    }

    /// 管理员登录：与配置的静态凭据比对
    pub fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        if request.email != self.admin.email || !self.verify_admin_password(&request.password)? {
            return Err(AppError::AuthError(
                "Invalid email or password".to_string(),
            ));
        }

        self.issue_tokens(&request.email)
    }

    /// 用refresh token换取新的令牌对
    pub fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        self.issue_tokens(&claims.sub)
    }

    // 配置值为bcrypt哈希（$2开头）时走哈希校验，否则明文比对
    fn verify_admin_password(&self, candidate: &str) -> AppResult<bool> {
        let configured = &self.admin.password;

        if configured.is_empty() {
            return Ok(false);
        }

        if configured.starts_with("$2") {
            verify_password(candidate, configured)
        } else {
            Ok(candidate == configured)
        }
    }

    fn issue_tokens(&self, subject: &str) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            access_token: self.jwt_service.generate_access_token(subject)?,
            refresh_token: self.jwt_service.generate_refresh_token(subject)?,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in(),
        })
    }
}
