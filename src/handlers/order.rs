use crate::models::*;
use crate::services::{NotificationService, OrderService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "下单成功"),
        (status = 400, description = "缺少必填字段"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    notification_service: web::Data<NotificationService>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create_order(request.into_inner()).await {
        Ok(order) => {
            // 通知只尝试一次，失败记录日志，不影响下单结果
            if let Err(e) = notification_service.notify_new_order(&order).await {
                log::error!("Error sending order notification: {:?}", e);
            }

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Order submitted successfully",
                "orderId": order.id
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/orders").route("", web::post().to(create_order)));
}
