//! Browser adapters for the chat-core ports.

pub mod storage;
pub mod remote;

pub use remote::HttpReplyBackend;
