//! WASM-target tests for chat-platform (Node.js runtime).
//!
//! Tests MemoryStorage, backend selection fallbacks and the session store
//! running on top of them under wasm32-unknown-unknown via
//! `wasm-pack test --node`. Node has no `window`, so localStorage is always
//! unavailable here and the memory fallback is exercised.

use wasm_bindgen_test::*;

use chat_platform::storage::{auto_detect_storage, storage_for, LocalStorage, MemoryStorage};
use chat_platform::HttpReplyBackend;
use chat_core::clock::SystemClock;
use chat_core::ports::{ReplyBackendPort, StoragePort};
use chat_core::store::SessionStore;
use chat_types::config::{BackendConfig, ChatConfig, StorageBackendType};
use chat_types::ChatError;
use std::rc::Rc;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
    assert!(storage.is_empty());
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("chatSessions", b"{}").await.unwrap();
    storage.set("chatSessions", b"{\"1\":[]}").await.unwrap();
    assert_eq!(storage.get("chatSessions").await.unwrap(), Some(b"{\"1\":[]}".to_vec()));
    assert_eq!(storage.len(), 1);

    storage.set("currentSessionId", b"1").await.unwrap();
    assert_eq!(storage.len(), 2);
}

// ─── Backend selection ───────────────────────────────────

#[wasm_bindgen_test]
fn local_storage_missing_under_node() {
    assert!(matches!(LocalStorage::open(), Err(ChatError::Storage(_))));
}

#[wasm_bindgen_test]
fn auto_detect_falls_back_to_memory() {
    assert_eq!(auto_detect_storage().backend_name(), "memory");
    assert_eq!(storage_for(&StorageBackendType::Memory).backend_name(), "memory");
    assert_eq!(storage_for(&StorageBackendType::LocalStorage).backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn store_on_memory_fallback() {
    let storage = auto_detect_storage();
    let mut store =
        SessionStore::initialize(storage.clone(), ChatConfig::default(), Rc::new(SystemClock)).await;
    store.append_user_message("What is CSS?").await;
    assert!(storage.get("chatSessions").await.unwrap().is_some());
    assert_eq!(
        storage.get("currentSessionId").await.unwrap(),
        Some(store.active_id().to_string().into_bytes())
    );
    assert_eq!(store.list_session_summaries()[0].title, "What is CSS?");
}

// ─── HttpReplyBackend ────────────────────────────────────

#[wasm_bindgen_test]
fn http_backend_rejects_bad_url() {
    assert!(matches!(
        HttpReplyBackend::new(BackendConfig::new("ftp://example.com")),
        Err(ChatError::Config(_))
    ));
}

#[wasm_bindgen_test]
fn http_backend_endpoint() {
    let backend = HttpReplyBackend::new(BackendConfig::new("http://localhost:3000/api/chat")).unwrap();
    assert_eq!(backend.endpoint(), "http://localhost:3000/api/chat");
    assert_eq!(backend.config().timeout_ms, 5_000);
}
