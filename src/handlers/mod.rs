pub mod admin;
pub mod auth;
pub mod notification;
pub mod order;
pub mod upload;

pub use admin::admin_config;
pub use auth::auth_config;
pub use notification::notification_config;
pub use order::order_config;
pub use upload::upload_config;
