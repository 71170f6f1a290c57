//! Chat core: everything the chatbot does that does not touch the browser.
//!
//! The platform crate supplies [`ports::StoragePort`] and
//! [`ports::ReplyBackendPort`] implementations; the UI only talks to
//! [`conversation::Conversation`].

pub mod ports;
pub mod clock;
pub mod event_bus;
pub mod store;
pub mod calc;
pub mod knowledge;
pub mod responder;
pub mod upload;
pub mod conversation;
