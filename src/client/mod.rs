pub mod admin_store;
pub mod gateway;
pub mod intake;

pub use admin_store::*;
pub use gateway::*;
pub use intake::*;
