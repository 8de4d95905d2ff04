//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();
        storage.set("slot", "value").unwrap();
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_missing_slot_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nonexistent").unwrap(), None);
        assert!(!storage.exists("nonexistent").unwrap());
    }

    #[test]
    fn test_set_overwrites() {
        let storage = MemoryStorage::new();
        storage.set("slot", "first").unwrap();
        storage.set("slot", "second").unwrap();
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("second"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.set("slot", "value").unwrap();
        storage.remove("slot").unwrap();
        storage.remove("slot").unwrap();
        assert!(storage.is_empty());
    }
}
