use crate::entities::order_entity as orders;
use crate::error::{AppError, AppResult};
use crate::external::Mailer;
use crate::models::OrderResponse;

#[derive(Clone)]
pub struct NotificationService {
    mailer: Mailer,
    admin_emails: Vec<String>,
}

impl NotificationService {
    pub fn new(mailer: Mailer, admin_emails: Vec<String>) -> Self {
        Self {
            mailer,
            admin_emails,
        }
    }

    /// 新订单通知：收件人未配置时记录警告并跳过。
    /// 单次尝试，发送失败只记录日志，由调用方决定是否忽略。
    pub async fn notify_new_order(&self, order: &orders::Model) -> AppResult<()> {
        if self.admin_emails.is_empty() {
            log::warn!("No admin emails configured, skipping order notification");
            return Ok(());
        }

        let order_details = serde_json::to_string_pretty(&OrderResponse::from(order.clone()))?;

        self.send_order_email(&self.admin_emails, order.id, &order.full_name, &order_details)
            .await
    }

    /// 给指定收件人发送一封新订单邮件
    pub async fn send_order_email(
        &self,
        recipients: &[String],
        order_id: i64,
        customer_name: &str,
        order_details: &str,
    ) -> AppResult<()> {
        if recipients.is_empty() {
            return Err(AppError::ValidationError(
                "No recipients provided".to_string(),
            ));
        }

        let subject = format!("New Order Received - ID: {}", order_id);
        let body = format!(
            "Hello Admin,\n\nA new order has been placed by {}.\n\nOrder Details:\n{}\n\nPlease review it as soon as possible.\n\nThanks!",
            customer_name, order_details
        );

        self.mailer.send_email(recipients, &subject, &body).await?;
        log::info!("Order notification email sent for order {}", order_id);

        Ok(())
    }
}
