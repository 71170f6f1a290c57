//! egui panels for the chatbot. Panels only render and report what the user
//! did; the app crate turns those actions into `Conversation` calls.

pub mod state;
pub mod theme;
pub mod markdown;
pub mod panels;

#[cfg(test)]
mod tests;
