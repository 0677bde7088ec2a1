/// Session-scoped key/value storage.
///
/// The breadcrumb trail persists through this trait instead of touching any
/// global storage, so it can be exercised with [`MemoryStore`] in tests and
/// backed by [`JsonFileStore`] in the application.
use crate::error::StoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// String values under string keys, scoped to one session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Remove `key`. Removing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store; lives exactly as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// One file per key under a session directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash never leaves a half-written value behind.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serialises writers within this process.
    write_lock: Mutex<()>,
    // Set by `temporary`; removes the directory on drop.
    _owned: Option<TempDir>,
}

impl JsonFileStore {
    /// Use (and create if needed) `dir` as the session directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
            _owned: None,
        })
    }

    /// A fresh directory that is deleted when the store is dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        let owned = tempfile::Builder::new().prefix("stlvault-session-").tempdir()?;
        Ok(Self {
            dir: owned.path().to_path_buf(),
            write_lock: Mutex::new(()),
            _owned: Some(owned),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.clear("k").unwrap();
        store.clear("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        {
            let store = JsonFileStore::open(tmp.path()).unwrap();
            store.set("folderBreadcrumb", "[1,2]").unwrap();
        }
        let store = JsonFileStore::open(tmp.path()).unwrap();
        assert_eq!(store.get("folderBreadcrumb").as_deref(), Some("[1,2]"));
        store.clear("folderBreadcrumb").unwrap();
        assert_eq!(store.get("folderBreadcrumb"), None);
        // Clearing again is fine.
        store.clear("folderBreadcrumb").unwrap();
    }

    #[test]
    fn test_file_store_sanitises_keys() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path().join("nested")).unwrap();
        store.set("../escape", "x").unwrap();
        assert!(store.dir().join("___escape.json").exists());
        assert_eq!(store.get("../escape").as_deref(), Some("x"));
    }

    #[test]
    fn test_temporary_store_removed_on_drop() {
        let store = JsonFileStore::temporary().unwrap();
        let dir = store.dir().to_path_buf();
        store.set("folderBreadcrumb", "[]").unwrap();
        assert!(dir.join("folderBreadcrumb.json").exists());

        drop(store);
        assert!(!dir.exists());
    }
}
