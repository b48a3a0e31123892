//! Persistent key/value storage
//!
//! A flat map of string keys to string values, the client-side equivalent of
//! browser local storage. Values that hold structured data (the analytics log)
//! are JSON strings themselves.
//!
//! Reads never fail: a missing key is `None`. Writes report errors so callers
//! can decide whether to surface or swallow them.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// String key/value store shared across the application
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn KeyValueStore>;

type Items = BTreeMap<String, String>;

fn lock(items: &Mutex<Items>) -> MutexGuard<'_, Items> {
    items.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Items>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// The file is read once when the store is opened and rewritten in full after
/// every mutation. The in-memory copy is updated even if the write fails.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<Items>,
}

impl FileStore {
    /// Open the store at `path`
    ///
    /// A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match Self::read_items(&path) {
            Ok(items) => {
                log::debug!("Loaded {} stored keys from {:?}", items.len(), path);
                items
            }
            Err(e) => {
                if path.exists() {
                    log::warn!("Ignoring unreadable storage file {:?}: {:#}", path, e);
                } else {
                    log::debug!("No storage file at {:?}, starting fresh", path);
                }
                Items::new()
            }
        };

        Self {
            path,
            items: Mutex::new(items),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(path: &Path) -> Result<Items> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read storage file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse storage file: {:?}", path))
    }

    fn write_items(&self, items: &Items) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(items).context("Failed to serialize storage")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write storage file: {:?}", self.path))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = lock(&self.items);
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = lock(&self.items);
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k"), None);

        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").as_deref(), Some("v2"));

        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k"), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path);
        store.set_item("access_token", "abc").unwrap();
        store.set_item("theme", "dark").unwrap();
        store.remove_item("theme").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_item("access_token").as_deref(), Some("abc"));
        assert_eq!(reopened.get_item("theme"), None);
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get_item("anything"), None);

        // The next write replaces the corrupt file
        store.set_item("theme", "light").unwrap();
        assert_eq!(
            FileStore::open(&path).get_item("theme").as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_file_store_write_failure_keeps_memory_copy() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file
        let store = FileStore::open(dir.path());

        assert!(store.set_item("k", "v").is_err());
        assert_eq!(store.get_item("k").as_deref(), Some("v"));
    }
}
