use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, CreateOrderRequest, OrderResponse, OrderStatus};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// 注入式数据访问边界：下单表单与管理端视图都只通过它访问后端，
/// 测试时可替换为内存实现
#[async_trait]
pub trait CommissionGateway: Send + Sync {
    /// 上传编码图片，返回同序的公开URL
    async fn upload_images(&self, images: &[String]) -> AppResult<Vec<String>>;

    /// 提交订单，返回订单ID
    async fn submit_order(&self, order: &CreateOrderRequest) -> AppResult<i64>;

    /// 拉取全量订单列表（按下单时间倒序）
    async fn fetch_orders(&self) -> AppResult<Vec<OrderResponse>>;

    /// 更新单个订单状态，返回更新后的订单
    async fn update_status(&self, order_id: i64, status: OrderStatus)
    -> AppResult<OrderResponse>;
}

/// 走REST接口的网关实现
pub struct HttpGateway {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// 管理端调用需要携带登录获得的access token
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn error_from_response(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|text| {
                serde_json::from_str::<ApiResponse<serde_json::Value>>(&text).ok()
            })
            .and_then(|envelope| envelope.error.map(|e| e.message).or(envelope.message))
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        match status.as_u16() {
            400 => AppError::ValidationError(message),
            401 => AppError::AuthError(message),
            404 => AppError::NotFound(message),
            _ => AppError::ExternalApiError(message),
        }
    }
}

#[async_trait]
impl CommissionGateway for HttpGateway {
    async fn upload_images(&self, images: &[String]) -> AppResult<Vec<String>> {
        let response = self
            .request(reqwest::Method::POST, "/api/uploads")
            .json(&json!({ "images": images }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UploadEnvelope {
            image_urls: Vec<String>,
        }

        let envelope: UploadEnvelope = response.json().await?;
        Ok(envelope.image_urls)
    }

    async fn submit_order(&self, order: &CreateOrderRequest) -> AppResult<i64> {
        let response = self
            .request(reqwest::Method::POST, "/api/orders")
            .json(order)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateOrderEnvelope {
            order_id: i64,
        }

        let envelope: CreateOrderEnvelope = response.json().await?;
        Ok(envelope.order_id)
    }

    async fn fetch_orders(&self) -> AppResult<Vec<OrderResponse>> {
        let response = self
            .request(reqwest::Method::GET, "/api/admin/orders")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        #[derive(Deserialize)]
        struct OrdersEnvelope {
            orders: Vec<OrderResponse>,
        }

        let envelope: OrdersEnvelope = response.json().await?;
        Ok(envelope.orders)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> AppResult<OrderResponse> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                &format!("/api/admin/orders/{}", order_id),
            )
            .json(&json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        #[derive(Deserialize)]
        struct UpdateEnvelope {
            order: OrderResponse,
        }

        let envelope: UpdateEnvelope = response.json().await?;
        Ok(envelope.order)
    }
}
