use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderEmailRequest {
    #[serde(default)]
    pub recipients: Vec<String>,
    pub order_id: i64,
    pub customer_name: String,
    pub order_details: String,
}
