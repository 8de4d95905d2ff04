//! File-based storage implementation for native platforms.

use super::{Storage, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Each slot is a text file named after its (sanitized) key.
pub struct FileStorage {
    /// Directory holding the slot files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage rooted at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/scribble/slots/`
    /// On Windows: `%LOCALAPPDATA%\scribble\slots\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Unavailable("Could not determine home directory".to_string()))?;

        Self::new(base.join("scribble").join("slots"))
    }

    /// Get the file path for a slot key.
    fn slot_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.slot", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_set_get() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.set("savedDrawing", "data:image/png;base64,AAAA").unwrap();
        assert_eq!(
            storage.get("savedDrawing").unwrap().as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert!(dir.path().join("savedDrawing.slot").exists());
    }

    #[test]
    fn test_file_storage_missing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(storage.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.set("slot", "value").unwrap();
        storage.remove("slot").unwrap();
        assert!(!storage.exists("slot").unwrap());
        storage.remove("slot").unwrap();
    }

    #[test]
    fn test_key_sanitized() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.set("../escape/slot", "value").unwrap();
        assert!(dir.path().join("___escape_slot.slot").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert_eq!(storage.base_path(), nested.as_path());
        assert!(nested.is_dir());
    }
}
