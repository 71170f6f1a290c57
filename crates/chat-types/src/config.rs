use serde::{Deserialize, Serialize};

/// Top-level chatbot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub storage: StorageConfig,
    /// Sidebar titles are cut to this many characters
    pub title_max_chars: usize,
    /// Title for sessions that have no user message yet
    pub placeholder_title: String,
    /// Assistant message seeded into every new session
    pub greeting: String,
    /// Simulated "thinking" time before a reply is appended
    pub thinking_delay_ms: u32,
    /// Optional remote reply service, consulted only when no local rule matches
    pub backend: Option<BackendConfig>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            title_max_chars: 30,
            placeholder_title: "New Chat".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            thinking_delay_ms: 600,
            backend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    /// Key of the `{ id: [messages] }` blob
    pub sessions_key: String,
    /// Key of the plain-string active session id
    pub active_key: String,
    /// Key under which this config itself is saved
    pub config_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
            sessions_key: "chatSessions".to_string(),
            active_key: "currentSessionId".to_string(),
            config_key: "chatbot:config".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

impl StorageBackendType {
    pub fn all() -> &'static [StorageBackendType] {
        &[
            StorageBackendType::Auto,
            StorageBackendType::Memory,
            StorageBackendType::LocalStorage,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            StorageBackendType::Auto => "Auto-detect",
            StorageBackendType::Memory => "Memory",
            StorageBackendType::LocalStorage => "localStorage",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            StorageBackendType::Auto => "Uses localStorage when the browser allows it, otherwise Memory.",
            StorageBackendType::Memory => "Fast but volatile. All chats are lost on page reload.",
            StorageBackendType::LocalStorage => "Persistent browser storage. Chats survive page reloads.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_ms: u32,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: 5_000,
        }
    }
}

const DEFAULT_GREETING: &str =
    "Hello! I'm your AI assistant. Ask me about web development, tell me to **calculate** something like `5 + 3`, or ask for a joke.";
