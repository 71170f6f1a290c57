//! Session store: owns every conversation and the id of the active one.
//!
//! The blob store is a cache, not the source of truth: unreadable or corrupt
//! data is logged and replaced by a fresh store, and failed writes leave the
//! in-memory state authoritative. Every mutation rewrites the whole snapshot,
//! so a failed write is retried by the next mutation.
//!
//! Invariants kept by every public method:
//! - `sessions` is never empty
//! - `active_id` is always a key of `sessions`

use std::collections::BTreeMap;
use std::rc::Rc;

use chat_types::{
    ChatError, Result,
    config::ChatConfig,
    message::Message,
    session::{Session, SessionId, SessionSummary, StoreSnapshot},
};
use crate::ports::{Clock, StoragePort};

pub struct SessionStore {
    sessions: BTreeMap<SessionId, Session>,
    active_id: SessionId,
    /// Highest id ever handed out by this store; new ids go above it
    last_issued: SessionId,
    config: ChatConfig,
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn Clock>,
    last_write_error: Option<String>,
}

impl SessionStore {
    /// Load the persisted sessions, or start with one fresh session when
    /// nothing usable is stored. Never fails.
    pub async fn initialize(
        storage: Rc<dyn StoragePort>,
        config: ChatConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let loaded = match Self::load(storage.as_ref(), &config).await {
            Ok(Some(snapshot)) => Some(snapshot),
            Ok(None) => {
                log::info!("No saved chats in {}, starting fresh", storage.backend_name());
                None
            }
            Err(e) => {
                log::warn!("Ignoring saved chats: {}", e);
                None
            }
        };

        let mut store = Self::empty(storage, config, clock);
        let repaired = match loaded {
            Some(snapshot) => store.restore(snapshot),
            None => {
                store.insert_fresh_session();
                true
            }
        };

        if repaired {
            store.persist().await;
        }
        log::info!(
            "Session store ready: {} session(s), active {}",
            store.sessions.len(),
            store.active_id
        );
        store
    }

    /// Build a store from a snapshot without reading or writing storage.
    /// The snapshot is repaired the same way a loaded one is.
    pub fn from_snapshot(
        snapshot: StoreSnapshot,
        storage: Rc<dyn StoragePort>,
        config: ChatConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let mut store = Self::empty(storage, config, clock);
        store.restore(snapshot);
        store
    }

    fn empty(storage: Rc<dyn StoragePort>, config: ChatConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            sessions: BTreeMap::new(),
            active_id: SessionId(0),
            last_issued: SessionId(0),
            config,
            storage,
            clock,
            last_write_error: None,
        }
    }

    async fn load(storage: &dyn StoragePort, config: &ChatConfig) -> Result<Option<StoreSnapshot>> {
        let keys = &config.storage;
        let bytes = storage
            .get(&keys.sessions_key)
            .await
            .map_err(|e| ChatError::PersistenceRead(e.to_string()))?;
        let Some(bytes) = bytes else {
            return Ok(None);
        };

        let sessions = StoreSnapshot::sessions_from_json(&bytes)
            .map_err(|e| ChatError::PersistenceRead(e.to_string()))?;
        if sessions.is_empty() {
            return Ok(None);
        }

        let active_id = match storage.get(&keys.active_key).await {
            Ok(Some(raw)) => StoreSnapshot::active_id_from_bytes(&raw),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read active session id: {}", e);
                None
            }
        };

        Ok(Some(StoreSnapshot { sessions, active_id }))
    }

    /// Rebuild state from a snapshot. Returns true when something had to be
    /// repaired (empty logs, missing or dangling active id).
    fn restore(&mut self, snapshot: StoreSnapshot) -> bool {
        let mut repaired = false;
        for (id, messages) in snapshot.sessions {
            let session = if messages.is_empty() {
                log::debug!("Session {} had an empty log, re-seeding greeting", id);
                repaired = true;
                Session::seeded(id, &self.config.greeting)
            } else {
                Session { id, messages }
            };
            self.sessions.insert(id, session);
        }

        self.last_issued = self.sessions.keys().next_back().copied().unwrap_or(SessionId(0));

        match snapshot.active_id {
            Some(id) if self.sessions.contains_key(&id) => self.active_id = id,
            other => {
                log::debug!("Active session {:?} not found, selecting most recent", other);
                self.active_id = self.last_issued;
                repaired = true;
            }
        }

        if self.sessions.is_empty() {
            self.insert_fresh_session();
            repaired = true;
        }
        repaired
    }

    // ─── Queries ─────────────────────────────────────────────

    /// The session currently displayed and receiving messages.
    pub fn active(&self) -> Result<&Session> {
        self.sessions.get(&self.active_id).ok_or_else(|| {
            ChatError::InvariantViolation(format!("active session {} does not exist", self.active_id))
        })
    }

    pub fn active_id(&self) -> SessionId {
        self.active_id
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// True when the most recent write to the blob store failed.
    pub fn is_dirty(&self) -> bool {
        self.last_write_error.is_some()
    }

    pub fn last_write_error(&self) -> Option<&str> {
        self.last_write_error.as_deref()
    }

    /// Sidebar listing, newest first.
    pub fn list_session_summaries(&self) -> Vec<SessionSummary> {
        self.sessions
            .values()
            .rev()
            .map(|session| SessionSummary {
                id: session.id,
                title: session.title(self.config.title_max_chars, &self.config.placeholder_title),
                is_active: session.id == self.active_id,
            })
            .collect()
    }

    pub fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            sessions: self
                .sessions
                .iter()
                .map(|(id, session)| (*id, session.messages.clone()))
                .collect(),
            active_id: Some(self.active_id),
        }
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Take over display settings from an edited config. Storage keys keep
    /// their current values until the next start.
    pub fn apply_config(&mut self, config: ChatConfig) {
        let storage = std::mem::take(&mut self.config.storage);
        self.config = ChatConfig { storage, ..config };
    }

    /// Append a user message to the active session. Blank text is ignored;
    /// returns whether a message was appended.
    pub async fn append_user_message(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.push_to_active(Message::user(text));
        self.persist().await;
        true
    }

    pub async fn append_assistant_message(&mut self, text: &str) {
        self.push_to_active(Message::assistant(text));
        self.persist().await;
    }

    /// Append an assistant message to a specific session, which need not be
    /// the active one. Returns false if that session no longer exists.
    pub async fn append_assistant_message_to(&mut self, id: SessionId, text: &str) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.messages.push(Message::assistant(text));
                self.persist().await;
                true
            }
            None => {
                log::info!("Dropping reply for deleted session {}", id);
                false
            }
        }
    }

    /// Start a new session seeded with the greeting and make it active.
    pub async fn create_session(&mut self) -> SessionId {
        let id = self.insert_fresh_session();
        self.persist().await;
        log::debug!("Created session {}", id);
        id
    }

    pub async fn switch_to(&mut self, id: SessionId) -> Result<()> {
        if !self.sessions.contains_key(&id) {
            return Err(ChatError::UnknownSession(id));
        }
        self.active_id = id;
        self.persist().await;
        Ok(())
    }

    /// Remove a session. Deleting the active session selects the most
    /// recently created remaining one, or a brand-new session if none remain.
    /// Unknown ids are ignored. Returns whether a session was removed.
    pub async fn delete_session(&mut self, id: SessionId) -> bool {
        if self.sessions.remove(&id).is_none() {
            log::debug!("Delete of unknown session {} ignored", id);
            return false;
        }

        if id == self.active_id {
            match self.sessions.keys().next_back().copied() {
                Some(replacement) => self.active_id = replacement,
                None => {
                    self.insert_fresh_session();
                }
            }
        }
        self.persist().await;
        true
    }

    /// Drop every session and start over with a single fresh one.
    pub async fn clear_all(&mut self) {
        self.sessions.clear();
        self.insert_fresh_session();
        self.persist().await;
        log::info!("Chat history cleared");
    }

    /// Reset to a fresh default store after an invariant violation.
    pub async fn recover(&mut self) {
        log::error!("Session store inconsistent (active {}), resetting", self.active_id);
        self.clear_all().await;
    }

    // ─── Internals ───────────────────────────────────────────

    fn push_to_active(&mut self, message: Message) {
        if !self.sessions.contains_key(&self.active_id) {
            log::error!("Active session {} missing, starting a new one", self.active_id);
            self.sessions.clear();
            self.insert_fresh_session();
        }
        if let Some(session) = self.sessions.get_mut(&self.active_id) {
            session.messages.push(message);
        }
    }

    /// Time-based id, bumped above every id already issued so two calls in
    /// the same millisecond still differ. Once the id space above the newest
    /// session is exhausted, the smallest id not held by a session is used.
    fn next_id(&mut self) -> SessionId {
        let now = SessionId(self.clock.now_millis());
        match self.last_issued.next() {
            Some(after) if !self.sessions.contains_key(&now.max(after)) => {
                let id = now.max(after);
                self.last_issued = id;
                id
            }
            _ => {
                let id = self.smallest_free_id();
                log::warn!("Session ids exhausted above {}, reusing free id {}", self.last_issued, id);
                id
            }
        }
    }

    fn smallest_free_id(&self) -> SessionId {
        let mut candidate = 1;
        for id in self.sessions.keys() {
            if id.0 > candidate {
                break;
            }
            if id.0 == candidate {
                candidate += 1;
            }
        }
        SessionId(candidate)
    }

    fn insert_fresh_session(&mut self) -> SessionId {
        let id = self.next_id();
        debug_assert!(!self.sessions.contains_key(&id));
        self.sessions.insert(id, Session::seeded(id, &self.config.greeting));
        self.active_id = id;
        id
    }

    async fn persist(&mut self) {
        match self.write_snapshot().await {
            Ok(()) => {
                if self.last_write_error.take().is_some() {
                    log::info!("Persistence recovered");
                }
            }
            Err(e) => {
                log::warn!("{} (keeping chats in memory)", e);
                self.last_write_error = Some(e.to_string());
            }
        }
    }

    async fn write_snapshot(&self) -> Result<()> {
        let snapshot = self.to_snapshot();
        let keys = &self.config.storage;
        let sessions = snapshot.sessions_to_json()?;
        self.storage
            .set(&keys.sessions_key, &sessions)
            .await
            .map_err(|e| ChatError::PersistenceWrite(e.to_string()))?;
        if let Some(active) = snapshot.active_id_to_bytes() {
            self.storage
                .set(&keys.active_key, &active)
                .await
                .map_err(|e| ChatError::PersistenceWrite(e.to_string()))?;
        }
        Ok(())
    }
}
