use crate::entities::order_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::entities::orders::{ContactChannel, OrderStatus};

/// 收货地址，字段命名与前端表单一致
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub preferred_communication: ContactChannel,
    pub artwork_type: String,
    pub medium: String,
    pub size: String,
    #[serde(default)]
    pub color_palette: Option<String>,
    /// 只接受上传中转返回的URL，表单不会提交原始图片数据
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub purpose: String,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub newsletter: bool,
    /// 缺省时由服务器取当前时间
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

/// 通用部分更新：每个可变字段都可覆盖，没有白名单。
/// status 通过枚举约束，存储层不会收到四个值以外的状态。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_communication: Option<ContactChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub preferred_communication: ContactChannel,
    pub artwork_type: String,
    pub medium: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
    pub image_urls: Vec<String>,
    pub purpose: String,
    pub shipping_address: ShippingAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    pub newsletter: bool,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        let image_urls: Vec<String> = serde_json::from_value(m.image_urls).unwrap_or_default();

        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            preferred_communication: m.preferred_communication,
            artwork_type: m.artwork_type,
            medium: m.medium,
            size: m.size,
            color_palette: m.color_palette,
            image_urls,
            purpose: m.purpose,
            shipping_address: ShippingAddress {
                address_line1: m.address_line1,
                address_line2: m.address_line2,
                city: m.city,
                state: m.state,
                postal_code: m.postal_code,
                country: m.country,
            },
            additional_notes: m.additional_notes,
            newsletter: m.newsletter,
            status: m.status,
            order_date: m.order_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkTypeCount {
    pub artwork_type: String,
    pub count: i64,
}

/// 管理端报表数据，对应仪表盘的状态分布与作品类型分布
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub new_orders: i64,
    pub in_progress_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub orders_by_artwork_type: Vec<ArtworkTypeCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
        assert!(serde_json::from_str::<OrderStatus>("\"shipped\"").is_err());
    }

    #[test]
    fn test_create_request_has_no_status_field() {
        // 客户端提交的status会被忽略，新订单总是以 new 入库
        let body = serde_json::json!({
            "fullName": "Jane Doe",
            "email": "jane@x.com",
            "artworkType": "painting",
            "medium": "oil",
            "size": "medium",
            "purpose": "gift",
            "status": "completed",
            "shippingAddress": {
                "addressLine1": "1 Main St",
                "city": "Lagos",
                "state": "Lagos",
                "postalCode": "100001",
                "country": "Nigeria"
            }
        });

        let request: CreateOrderRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.full_name, "Jane Doe");
        assert!(request.image_urls.is_empty());
        assert!(request.order_date.is_none());
    }
}
