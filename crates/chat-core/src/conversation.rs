//! Conversation controller: one user turn at a time.
//!
//! A turn is split so the UI can insert the "thinking" delay without
//! holding a borrow of the controller:
//! 1. [`Conversation::submit`] appends the user message, computes the local
//!    reply and returns a [`PendingTurn`] bound to the session that was
//!    active at submission
//! 2. [`PendingTurn::resolve`] optionally asks the remote backend when no
//!    local rule matched
//! 3. [`Conversation::complete`] appends the reply to the bound session and
//!    re-enables input
//!
//! While a turn is pending, further submissions fail with `ChatError::Busy`.

use std::collections::HashMap;
use std::rc::Rc;

use chat_types::{
    ChatError, Result,
    config::ChatConfig,
    event::ChatEvent,
    session::{Session, SessionId, SessionSummary},
};
use crate::event_bus::EventBus;
use crate::ports::ReplyBackendPort;
use crate::responder::{Reply, Responder};
use crate::store::SessionStore;
use crate::upload::{self, DroppedFile};

/// A submitted turn whose reply has not been appended yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub turn_id: u64,
    pub session_id: SessionId,
    pub user_text: String,
    pub reply: Reply,
}

impl PendingTurn {
    /// Ask the remote backend when the local reply is the fallback. Any
    /// backend failure keeps the local reply.
    pub async fn resolve(&mut self, backend: Option<&dyn ReplyBackendPort>) {
        if self.reply.matched {
            return;
        }
        let Some(backend) = backend else {
            return;
        };
        match backend.ask(&self.user_text).await {
            Ok(text) if !text.trim().is_empty() => {
                log::debug!("Reply for turn {} from {}", self.turn_id, backend.endpoint());
                self.reply = Reply::matched(text.trim());
            }
            Ok(_) => log::warn!("Backend {} returned an empty reply", backend.endpoint()),
            Err(e) => log::warn!("Backend {} failed: {}", backend.endpoint(), e),
        }
    }
}

pub struct Conversation {
    store: SessionStore,
    responder: Box<dyn Responder>,
    backend: Option<Rc<dyn ReplyBackendPort>>,
    event_bus: EventBus,
    /// Last reply produced per session in this page lifetime
    last_replies: HashMap<SessionId, Reply>,
    pending: Option<u64>,
    turn_counter: u64,
}

impl Conversation {
    pub fn new(store: SessionStore, responder: Box<dyn Responder>, event_bus: EventBus) -> Self {
        Self {
            store,
            responder,
            backend: None,
            event_bus,
            last_replies: HashMap::new(),
            pending: None,
            turn_counter: 0,
        }
    }

    pub fn with_backend(mut self, backend: Rc<dyn ReplyBackendPort>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn set_backend(&mut self, backend: Option<Rc<dyn ReplyBackendPort>>) {
        self.backend = backend;
    }

    pub fn backend(&self) -> Option<Rc<dyn ReplyBackendPort>> {
        self.backend.clone()
    }

    pub fn apply_config(&mut self, config: ChatConfig) {
        self.store.apply_config(config);
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// True while a reply is pending; the input surface stays disabled.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active_session(&self) -> Result<&Session> {
        self.store.active()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.store.list_session_summaries()
    }

    // ─── Turns ───────────────────────────────────────────────

    /// Accept user text and compute the local reply. Blank text yields
    /// `Ok(None)` and changes nothing.
    pub async fn submit(&mut self, text: &str) -> Result<Option<PendingTurn>> {
        if self.pending.is_some() {
            return Err(ChatError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.ensure_consistent().await;
        let session_id = self.store.active_id();
        let previous = self.previous_reply(session_id);

        self.store.append_user_message(text).await;
        self.report_persistence();

        self.turn_counter += 1;
        let turn_id = self.turn_counter;
        self.pending = Some(turn_id);
        self.event_bus.emit(ChatEvent::TurnStart { turn_id, session_id });

        let reply = self.responder.respond(text, &previous);
        log::debug!("Turn {} in session {}: matched={}", turn_id, session_id, reply.matched);

        Ok(Some(PendingTurn {
            turn_id,
            session_id,
            user_text: text.to_string(),
            reply,
        }))
    }

    /// Append the reply of a pending turn to the session it was submitted
    /// in. If that session was deleted meanwhile the reply is dropped.
    pub async fn complete(&mut self, turn: PendingTurn) {
        if self.pending != Some(turn.turn_id) {
            log::warn!("Completing turn {} which is not the pending turn", turn.turn_id);
        }
        self.event_bus.emit(ChatEvent::ReplyReady {
            session_id: turn.session_id,
            text: turn.reply.text.clone(),
        });

        if self
            .store
            .append_assistant_message_to(turn.session_id, &turn.reply.text)
            .await
        {
            self.last_replies.insert(turn.session_id, turn.reply);
        }
        self.report_persistence();

        self.pending = None;
        self.event_bus.emit(ChatEvent::TurnEnd { turn_id: turn.turn_id });
    }

    /// Submit, resolve and complete without any delay.
    pub async fn run_turn(&mut self, text: &str) -> Result<Option<Reply>> {
        let Some(mut turn) = self.submit(text).await? else {
            return Ok(None);
        };
        let backend = self.backend.clone();
        turn.resolve(backend.as_deref()).await;
        let reply = turn.reply.clone();
        self.complete(turn).await;
        Ok(Some(reply))
    }

    /// Record dropped files as user messages and acknowledge them.
    pub async fn upload(&mut self, files: &[DroppedFile]) -> Result<()> {
        if self.pending.is_some() {
            return Err(ChatError::Busy);
        }
        if files.is_empty() {
            return Ok(());
        }
        self.ensure_consistent().await;
        for file in files {
            self.store.append_user_message(&file.describe()).await;
        }
        let ack = upload::acknowledge(files);
        self.store.append_assistant_message(&ack).await;
        self.last_replies.insert(self.store.active_id(), Reply::unmatched(ack));
        self.report_persistence();
        log::info!("Acknowledged {} dropped file(s)", files.len());
        Ok(())
    }

    // ─── Session management ──────────────────────────────────

    pub async fn new_session(&mut self) -> SessionId {
        let session_id = self.store.create_session().await;
        self.report_persistence();
        self.event_bus.emit(ChatEvent::SessionCreated { session_id });
        session_id
    }

    pub async fn switch_to(&mut self, session_id: SessionId) -> Result<()> {
        self.store.switch_to(session_id).await?;
        self.report_persistence();
        self.event_bus.emit(ChatEvent::SessionSwitched { session_id });
        Ok(())
    }

    pub async fn delete_session(&mut self, session_id: SessionId) {
        if self.store.delete_session(session_id).await {
            self.last_replies.remove(&session_id);
            self.report_persistence();
            self.event_bus.emit(ChatEvent::SessionDeleted { session_id });
        }
    }

    pub async fn clear_all(&mut self) {
        self.store.clear_all().await;
        self.last_replies.clear();
        self.report_persistence();
        self.event_bus.emit(ChatEvent::HistoryCleared);
    }

    // ─── Internals ───────────────────────────────────────────

    /// The reply context for the next turn: the reply produced earlier in
    /// this page lifetime, or else the session's last bot message, which is
    /// treated as unmatched since its origin is unknown after a reload.
    fn previous_reply(&self, session_id: SessionId) -> Reply {
        if let Some(reply) = self.last_replies.get(&session_id) {
            return reply.clone();
        }
        self.store
            .session(session_id)
            .and_then(|s| s.last_assistant_message())
            .map(|m| Reply::unmatched(m.text.clone()))
            .unwrap_or_default()
    }

    async fn ensure_consistent(&mut self) {
        if let Err(e) = self.store.active() {
            self.event_bus.emit(ChatEvent::Error { message: e.to_string() });
            self.store.recover().await;
            self.last_replies.clear();
        }
    }

    fn report_persistence(&self) {
        if let Some(message) = self.store.last_write_error() {
            self.event_bus.emit(ChatEvent::PersistFailed {
                message: message.to_string(),
            });
        }
    }
}
