//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use chat_types::Result;

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Reply Backend Port ──────────────────────────────────────

/// Optional remote service asked when no local rule matches.
/// Callers must treat every error as "no answer".
#[async_trait(?Send)]
pub trait ReplyBackendPort {
    async fn ask(&self, message: &str) -> Result<String>;

    fn endpoint(&self) -> &str;
}

// ─── Clock Port ──────────────────────────────────────────────

/// Wall-clock source for session ids.
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}
