//! `localStorage` as an auto-save backend.

use mc_editor::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// `None` when the page has no window or storage is disabled.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_reason(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Browsers throw QuotaExceededError here; the size limit is not exposed.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(js_reason(e)))
    }
}
