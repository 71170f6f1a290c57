//! WASM-target tests for chat-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_types::message::*;
use chat_types::config::*;
use chat_types::session::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_wire_format() {
    let json = serde_json::to_string(&Message::assistant("hello")).unwrap();
    assert_eq!(json, r#"{"type":"bot","text":"hello"}"#);
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back.role, Role::Assistant);
}

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn session_title_truncates_on_char_boundary() {
    let mut session = Session::seeded(SessionId(1), "Hi");
    session.messages.push(Message::user("こんにちは世界、元気ですか"));
    assert_eq!(session.title(5, "New Chat"), "こんにちは...");
}

#[wasm_bindgen_test]
fn session_id_large_values_roundtrip() {
    let mut snapshot = StoreSnapshot::default();
    snapshot.sessions.insert(SessionId(1_700_000_000_000), vec![Message::user("x")]);
    let bytes = snapshot.sessions_to_json().unwrap();
    let back = StoreSnapshot::sessions_from_json(&bytes).unwrap();
    assert!(back.contains_key(&SessionId(1_700_000_000_000)));
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn config_roundtrip() {
    let mut config = ChatConfig::default();
    config.backend = Some(BackendConfig::new("http://localhost:3000/api/chat"));
    let json = serde_json::to_string(&config).unwrap();
    let back: ChatConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
