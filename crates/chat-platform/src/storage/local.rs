//! `window.localStorage` backend.
//! Persistent across page reloads, scoped to the page origin. Values are
//! stored as UTF-8 text since localStorage only holds strings.

use async_trait::async_trait;
use wasm_bindgen::JsValue;

use chat_core::ports::StoragePort;
use chat_types::{ChatError, Result};

const PROBE_KEY: &str = "__chat_storage_probe__";

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open localStorage and check that it accepts writes. Private browsing
    /// modes may expose the object but throw on `setItem`.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ChatError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| ChatError::Storage("localStorage not available".to_string()))?;

        storage.set_item(PROBE_KEY, "1").map_err(js_err)?;
        storage.remove_item(PROBE_KEY).map_err(js_err)?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.storage.get_item(key).map_err(js_err)?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| ChatError::Storage(format!("value for {} is not UTF-8: {}", key, e)))?;
        self.storage.set_item(key, text).map_err(js_err)
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}

/// Quota and security errors arrive as DOMExceptions.
fn js_err(e: JsValue) -> ChatError {
    let message = js_sys::Reflect::get(&e, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| format!("{:?}", e));
    ChatError::Storage(message)
}
