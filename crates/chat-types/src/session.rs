use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::message::{Message, Role};

/// Opaque session identifier derived from the creation time in milliseconds.
///
/// Ids are handed out strictly increasing, so ordering by id is ordering by
/// creation. Serialized as a bare number, or a decimal string when used as a
/// JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` at `u64::MAX`.
    pub fn next(&self) -> Option<SessionId> {
        self.0.checked_add(1).map(SessionId)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SessionId)
    }
}

/// One independent conversation thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub messages: Vec<Message>,
}

impl Session {
    /// A new session whose log starts with the assistant greeting.
    pub fn seeded(id: SessionId, greeting: &str) -> Self {
        Self {
            id,
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_user())
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Sidebar title: the first user message cut to `max_chars` characters,
    /// with `...` appended when something was cut off.
    pub fn title(&self, max_chars: usize, placeholder: &str) -> String {
        match self.first_user_message() {
            Some(msg) => truncate_title(&msg.text, max_chars),
            None => placeholder.to_string(),
        }
    }
}

/// Cut on character boundaries so multi-byte text never splits mid-codepoint.
pub fn truncate_title(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Entry in the newest-first sidebar listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub is_active: bool,
}

/// The persisted form of a store.
///
/// `sessions` is written under one key as `{ "<id>": [ {type, text}, ... ] }`
/// and `active_id` under a second key as a plain decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub sessions: BTreeMap<SessionId, Vec<Message>>,
    pub active_id: Option<SessionId>,
}

impl StoreSnapshot {
    pub fn sessions_to_json(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.sessions)?)
    }

    pub fn sessions_from_json(bytes: &[u8]) -> crate::Result<BTreeMap<SessionId, Vec<Message>>> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn active_id_to_bytes(&self) -> Option<Vec<u8>> {
        self.active_id.map(|id| id.to_string().into_bytes())
    }

    /// Parses the scalar active-id blob; anything unreadable is `None`.
    pub fn active_id_from_bytes(bytes: &[u8]) -> Option<SessionId> {
        std::str::from_utf8(bytes).ok()?.parse().ok()
    }
}
