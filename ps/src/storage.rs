//! Local key-value storage for submitted prompts
//!
//! A slot holds one string value (a JSON array of records) and is always
//! overwritten wholesale.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// String-keyed persistent slots
pub trait LocalStorage: Send + Sync {
    /// Read a slot, `None` if it was never written
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the whole value of a slot
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Directory-backed storage, one `<key>.json` file per slot
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create a storage directory
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "FileStorage::open: opened storage directory");
        Ok(Self { base_path })
    }

    /// File backing a slot; key characters outside `[A-Za-z0-9._-]` become `_`
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", name))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.slot_path(key);
        debug!(%key, ?path, "FileStorage::get_item: called");
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%key, "FileStorage::get_item: slot not written yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.slot_path(key);
        let tmp_path = path.with_extension("json.tmp");
        debug!(%key, ?path, bytes = value.len(), "FileStorage::set_item: called");

        // Readers must never observe a half-written slot
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        info!(%key, bytes = value.len(), "Wrote storage slot");
        Ok(())
    }
}

/// In-process storage with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes fail once a slot would exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Seed a slot without counting it as a write
    pub fn with_item(self, key: &str, value: &str) -> Self {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Number of successful `set_item` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| StoreError::Source("memory storage lock poisoned".to_string()))
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len(),
                quota,
            });
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path().join("storage")).unwrap();

        assert_eq!(storage.get_item("teacherPrompts").unwrap(), None);

        storage.set_item("teacherPrompts", "[]").unwrap();
        assert_eq!(storage.get_item("teacherPrompts").unwrap(), Some("[]".to_string()));

        storage.set_item("teacherPrompts", "[1]").unwrap();
        assert_eq!(storage.get_item("teacherPrompts").unwrap(), Some("[1]".to_string()));
        assert!(!storage.slot_path("teacherPrompts").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_slot_path_sanitizes_key() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        let path = storage.slot_path("../evil key");
        assert_eq!(path, temp.path().join(".._evil_key.json"));
        assert_eq!(path.parent(), Some(temp.path()));
    }

    #[test]
    fn test_memory_storage_counts_writes() {
        let storage = MemoryStorage::new().with_item("k", "seed");
        assert_eq!(storage.write_count(), 0);
        assert_eq!(storage.get_item("k").unwrap(), Some("seed".to_string()));

        storage.set_item("k", "next").unwrap();
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.get_item("k").unwrap(), Some("next".to_string()));
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(4);
        storage.set_item("k", "1234").unwrap();

        let err = storage.set_item("k", "12345").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 5, quota: 4, .. }));
        assert_eq!(storage.get_item("k").unwrap(), Some("1234".to_string()));
        assert_eq!(storage.write_count(), 1);
    }
}
