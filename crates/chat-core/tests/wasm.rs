//! WASM-target tests for chat-core.
//!
//! Runs the session store, responder and conversation flow under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_core::calc;
use chat_core::conversation::Conversation;
use chat_core::event_bus::EventBus;
use chat_core::ports::*;
use chat_core::responder::{LocalResponder, Reply, Responder, FALLBACK_REPLY};
use chat_core::store::SessionStore;
use chat_types::config::ChatConfig;
use chat_types::event::ChatEvent;
use chat_types::message::Role;
use chat_types::ChatError;

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// ─── Mocks ───────────────────────────────────────────────

struct MockStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
    fail_writes: Cell<bool>,
}

impl MockStorage {
    fn new() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            fail_writes: Cell::new(false),
        }
    }
}

#[async_trait(?Send)]
impl StoragePort for MockStorage {
    async fn get(&self, key: &str) -> chat_types::Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> chat_types::Result<()> {
        if self.fail_writes.get() {
            return Err(ChatError::Storage("quota exceeded".to_string()));
        }
        self.data.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct StepClock(Cell<u64>);

impl Clock for StepClock {
    fn now_millis(&self) -> u64 {
        self.0.get()
    }
}

struct EchoBackend;

#[async_trait(?Send)]
impl ReplyBackendPort for EchoBackend {
    async fn ask(&self, message: &str) -> chat_types::Result<String> {
        Ok(format!("echo: {}", message))
    }

    fn endpoint(&self) -> &str {
        "mock://echo"
    }
}

async fn store(storage: Rc<MockStorage>) -> SessionStore {
    SessionStore::initialize(
        storage,
        ChatConfig::default(),
        Rc::new(StepClock(Cell::new(1_700_000_000_000))),
    )
    .await
}

// ─── Responder Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn responder_calculates() {
    let reply = LocalResponder::default().respond("what is 6 * 7?", &Reply::default());
    assert!(reply.matched);
    assert!(reply.text.contains("42"));
}

#[wasm_bindgen_test]
fn responder_falls_back() {
    let reply = LocalResponder::default().respond("xyzzy", &Reply::default());
    assert!(!reply.matched);
    assert_eq!(reply.text, FALLBACK_REPLY);
}

#[wasm_bindgen_test]
fn calc_precedence() {
    assert_eq!(calc::evaluate("2 + 3 * 4").unwrap(), 14.0);
    assert_eq!(calc::format_number(calc::evaluate("7 / 2").unwrap()), "3.5");
}

// ─── SessionStore Tests (async) ──────────────────────────

#[wasm_bindgen_test]
async fn store_fresh_then_reload() {
    let storage = Rc::new(MockStorage::new());
    let mut first = store(storage.clone()).await;
    first.append_user_message("What is HTML?").await;
    first.create_session().await;

    let reloaded = store(storage).await;
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.active_id(), first.active_id());
    assert_eq!(reloaded.list_session_summaries(), first.list_session_summaries());
}

#[wasm_bindgen_test]
async fn store_corrupt_blob_starts_fresh() {
    let storage = Rc::new(MockStorage::new());
    storage
        .data
        .borrow_mut()
        .insert("chatSessions".to_string(), b"{not json".to_vec());
    let store = store(storage).await;
    assert_eq!(store.len(), 1);
    assert_eq!(store.list_session_summaries()[0].title, "New Chat");
}

#[wasm_bindgen_test]
async fn store_delete_last_session() {
    let storage = Rc::new(MockStorage::new());
    let mut store = store(storage).await;
    let only = store.active_id();
    assert!(store.delete_session(only).await);
    assert_eq!(store.len(), 1);
    assert_ne!(store.active_id(), only);
}

#[wasm_bindgen_test]
async fn store_survives_write_failure() {
    let storage = Rc::new(MockStorage::new());
    let mut store = store(storage.clone()).await;
    storage.fail_writes.set(true);
    store.append_user_message("still here").await;
    assert!(store.is_dirty());
    assert_eq!(store.active().unwrap().messages.len(), 2);

    storage.fail_writes.set(false);
    store.append_assistant_message("saved").await;
    assert!(!store.is_dirty());
}

// ─── Conversation Tests (async) ──────────────────────────

#[wasm_bindgen_test]
async fn conversation_turn() {
    let bus = EventBus::new();
    let store = store(Rc::new(MockStorage::new())).await;
    let mut convo = Conversation::new(store, Box::new(LocalResponder::default()), bus.clone());

    let reply = convo.run_turn("5+3").await.unwrap().unwrap();
    assert!(reply.text.contains('8'));

    let messages = &convo.active_session().unwrap().messages;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].role, Role::Assistant);

    let events = bus.drain();
    assert!(events.iter().any(|e| matches!(e, ChatEvent::ReplyReady { .. })));
    assert!(events.iter().any(|e| matches!(e, ChatEvent::TurnEnd { .. })));
}

#[wasm_bindgen_test]
async fn conversation_busy_while_pending() {
    let store = store(Rc::new(MockStorage::new())).await;
    let mut convo = Conversation::new(store, Box::new(LocalResponder::default()), EventBus::new());

    let turn = convo.submit("hello").await.unwrap().unwrap();
    assert!(matches!(convo.submit("again").await, Err(ChatError::Busy)));
    convo.complete(turn).await;
    assert!(!convo.is_busy());
}

#[wasm_bindgen_test]
async fn conversation_backend_for_unmatched() {
    let store = store(Rc::new(MockStorage::new())).await;
    let mut convo = Conversation::new(store, Box::new(LocalResponder::default()), EventBus::new())
        .with_backend(Rc::new(EchoBackend));

    let reply = convo.run_turn("xyzzy").await.unwrap().unwrap();
    assert_eq!(reply.text, "echo: xyzzy");

    let reply = convo.run_turn("what is rust").await.unwrap().unwrap();
    assert!(reply.text.contains("Rust"));
}
