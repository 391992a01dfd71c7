use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::order::create_order,
        handlers::upload::upload_images,
        handlers::notification::send_order_email,
        handlers::admin::get_orders,
        handlers::admin::update_order,
        handlers::admin::get_order_statistics,
    ),
    components(
        schemas(
            LoginRequest,
            AuthResponse,
            ShippingAddress,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderResponse,
            OrderStatus,
            ContactChannel,
            OrderStatistics,
            ArtworkTypeCount,
            UploadRequest,
            UploadResponse,
            SendOrderEmailRequest,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "管理员认证"),
        (name = "order", description = "订单提交"),
        (name = "upload", description = "图片上传中转"),
        (name = "notification", description = "邮件通知"),
        (name = "admin", description = "订单管理")
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
