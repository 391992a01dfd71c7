use crate::models::SendOrderEmailRequest;
use crate::services::NotificationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/sendOrderEmail",
    tag = "notification",
    request_body = SendOrderEmailRequest,
    responses(
        (status = 200, description = "通知邮件已发送"),
        (status = 400, description = "收件人为空"),
        (status = 502, description = "发送失败")
    )
)]
pub async fn send_order_email(
    notification_service: web::Data<NotificationService>,
    request: web::Json<SendOrderEmailRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();

    match notification_service
        .send_order_email(
            &request.recipients,
            request.order_id,
            &request.customer_name,
            &request.order_details,
        )
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Email notification sent."
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/sendOrderEmail").route("", web::post().to(send_order_email)));
}
