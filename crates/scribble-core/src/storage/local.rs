//! Browser `localStorage` implementation for WebAssembly.

use super::{Storage, StorageError, StorageResult};

/// Slot storage backed by `window.localStorage`.
///
/// Not Send/Sync: WASM is single-threaded and the handle is a JS object.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Grab the window's local storage.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to read {}: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Fails with a QuotaExceededError when the drawing is too large.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Other(format!("Failed to write {}: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to delete {}: {:?}", key, e)))
    }
}
