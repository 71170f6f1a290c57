//! UI-level state that drives rendering.
//! Messages and session titles are read straight from the store each frame;
//! this only holds what the store does not know about, updated by draining
//! the EventBus.

use chat_types::event::ChatEvent;

const LOADING_TEXT: &str = "Loading chats...";

/// State visible to UI panels
pub struct UiState {
    /// Input field content
    pub input_text: String,
    /// True from dispatch until the reply is appended; input is disabled meanwhile
    pub thinking: bool,
    /// Saved chats have been loaded; input stays disabled until then
    pub loaded: bool,
    pub show_sidebar: bool,
    pub show_settings: bool,
    /// Sidebar is asking "Clear all chats?"
    pub confirm_clear: bool,
    /// Status line text
    pub status_text: String,
    /// Set while the blob store rejects writes
    pub persist_warning: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            thinking: false,
            loaded: false,
            show_sidebar: true,
            show_settings: false,
            confirm_clear: false,
            status_text: LOADING_TEXT.to_string(),
            persist_warning: None,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::TurnStart { .. } => {
                    self.thinking = true;
                    self.status_text = "Thinking...".to_string();
                }
                ChatEvent::ReplyReady { .. } => {}
                ChatEvent::TurnEnd { .. } => {
                    self.thinking = false;
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::SessionCreated { .. } => {
                    self.status_text = "New chat started".to_string();
                }
                ChatEvent::SessionSwitched { .. } => {
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::SessionDeleted { .. } => {
                    self.status_text = "Chat deleted".to_string();
                }
                ChatEvent::HistoryCleared => {
                    self.confirm_clear = false;
                    self.status_text = "History cleared".to_string();
                }
                ChatEvent::PersistFailed { message } => {
                    self.persist_warning = Some(message);
                }
                ChatEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                }
            }
        }
    }

    /// Follow the controller's busy flag. Covers the gap between dispatch
    /// and `TurnStart`, and dispatches that never produce a turn.
    pub fn sync_busy(&mut self, busy: bool) {
        if busy == self.thinking {
            return;
        }
        self.thinking = busy;
        if busy {
            self.status_text = "Thinking...".to_string();
        } else if self.status_text == "Thinking..." {
            self.status_text = "Ready".to_string();
        }
    }

    /// Called once the conversation exists. Never reverts.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
        if self.status_text == LOADING_TEXT {
            self.status_text = "Ready".to_string();
        }
    }

    /// Whether the user can type and send right now
    pub fn accepts_input(&self) -> bool {
        self.loaded && !self.thinking
    }

    pub fn clear_persist_warning(&mut self) {
        self.persist_warning = None;
    }

    pub fn is_busy(&self) -> bool {
        self.thinking
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
