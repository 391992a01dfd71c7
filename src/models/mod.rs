pub mod auth;
pub mod common;
pub mod notification;
pub mod order;
pub mod upload;

pub use auth::*;
pub use common::*;
pub use notification::*;
pub use order::*;
pub use upload::*;
