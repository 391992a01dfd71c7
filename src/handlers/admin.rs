use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单列表成功（按下单时间倒序）"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_orders(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    match order_service.list_orders().await {
        Ok(orders) => {
            let orders: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

            Ok(HttpResponse::Ok().json(json!({
                "orders": orders
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/admin/orders/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "订单ID")
    ),
    request_body = UpdateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新订单成功"),
        (status = 404, description = "订单不存在"),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse> {
    let order_id = path.into_inner();

    match order_service.update_order(order_id, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "message": "Order updated successfully",
            "order": OrderResponse::from(order)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/orders/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单统计成功", body = OrderStatistics),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_order_statistics(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    match order_service.get_order_statistics().await {
        Ok(statistics) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": statistics
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/orders", web::get().to(get_orders))
            // stats 要先于 {id} 注册，避免被路径参数吞掉
            .route("/orders/stats", web::get().to(get_order_statistics))
            .route("/orders/{id}", web::patch().to(update_order)),
    );
}
