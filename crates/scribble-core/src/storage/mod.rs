//! Key-value slots for persisted drawings.
//!
//! A slot holds a single string value (a PNG data URL in practice). Backends
//! are synchronous: browser `localStorage` and the file system both answer
//! immediately, so there is nothing to await.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for slot storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Read a slot. Absent slots are `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot. Deleting an absent slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if a slot holds a value.
    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Trait for slot storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Read a slot. Absent slots are `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot. Deleting an absent slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if a slot holds a value.
    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
