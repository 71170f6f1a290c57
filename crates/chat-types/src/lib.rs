pub mod message;
pub mod event;
pub mod config;
pub mod error;
pub mod session;


pub use error::{CalcError, ChatError};
pub type Result<T> = std::result::Result<T, ChatError>;
