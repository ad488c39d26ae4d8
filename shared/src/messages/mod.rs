pub mod error;
pub mod frame;
pub mod get_message;
pub mod message;
