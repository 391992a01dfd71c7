use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AppError::ConfigError(format!("SMTP relay setup failed: {}", e)))?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// 发送一封纯文本邮件给全部收件人，单次尝试，不重试
    pub async fn send_email(&self, recipients: &[String], subject: &str, body: &str) -> AppResult<()> {
        let from = self
            .from_address
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid from address: {}", e)))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);

        for recipient in recipients {
            let to = recipient
                .parse()
                .map_err(|e| AppError::ValidationError(format!("Invalid recipient {}: {}", recipient, e)))?;
            builder = builder.to(to);
        }

        let email = builder
            .body(body.to_string())
            .map_err(|e| AppError::InternalError(format!("Failed to build email: {}", e)))?;

        match self.transport.send(email).await {
            Ok(_) => {
                log::info!("Email sent successfully to {} recipients", recipients.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to send email: {}", e);
                Err(AppError::ExternalApiError(format!(
                    "Email sending failed: {}",
                    e
                )))
            }
        }
    }
}
