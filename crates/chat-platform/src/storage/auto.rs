//! Pick the storage backend.
//!
//! Priority: localStorage → Memory (fallback)

use std::rc::Rc;
use chat_core::ports::StoragePort;
use chat_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Try to open the best available storage backend. Never fails: without a
/// usable localStorage the chats simply live until the page is closed.
pub fn auto_detect_storage() -> Rc<dyn StoragePort> {
    match LocalStorage::open() {
        Ok(local) => {
            log::info!("Storage backend: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Open the backend chosen in the settings panel.
pub fn storage_for(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Auto | StorageBackendType::LocalStorage => auto_detect_storage(),
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory (selected in settings)");
            Rc::new(MemoryStorage::new())
        }
    }
}
