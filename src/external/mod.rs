pub mod cloudinary;
pub mod mailer;

pub use cloudinary::*;
pub use mailer::*;
