use serde::{Deserialize, Serialize};
use crate::session::SessionId;

/// Events emitted by the conversation controller.
/// The UI drains these each frame to drive the status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A user message was accepted and a reply is being prepared
    TurnStart { turn_id: u64, session_id: SessionId },

    /// The reply text is known; the "thinking" delay may still be running
    ReplyReady { session_id: SessionId, text: String },

    /// The reply was appended and input is enabled again
    TurnEnd { turn_id: u64 },

    SessionCreated { session_id: SessionId },

    SessionSwitched { session_id: SessionId },

    SessionDeleted { session_id: SessionId },

    HistoryCleared,

    /// Writing to the blob store failed; state is kept in memory
    PersistFailed { message: String },

    Error { message: String },
}
