//! Synchronous string key-value storage.
//!
//! Stands in for per-origin browser storage: small, synchronous, and able to
//! refuse writes when full.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use uuid::Uuid;

/// Key holding the cached content document.
pub const CONTENT_KEY: &str = "site_content";
/// Key holding the user-data flag.
pub const USER_DATA_KEY: &str = "has_user_data";
/// Key holding the history ring buffer.
pub const HISTORY_KEY: &str = "content_history";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded { requested: usize, limit: usize },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode value for `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous get/set/remove over string keys.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store with an optional total size quota, counted in bytes of
/// keys plus values.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        let store = Self::default();
        store.set_quota(Some(quota));
        store
    }

    /// Change the quota. Existing entries are kept even if they exceed it.
    pub fn set_quota(&self, quota: Option<usize>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .quota = quota;
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = inner.quota {
            let others: usize = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > limit {
                return Err(StoreError::QuotaExceeded { requested, limit });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a directory.
///
/// Writes go to a uniquely named temporary file first and are renamed into
/// place, so a crash never leaves a half-written value behind and the last
/// concurrent writer of a key wins whole.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tmp = self
            .dir
            .join(format!(".{key}.{}.json.tmp", Uuid::new_v4().simple()));
        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, self.path_for(key)));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set_remove() {
        let store = MemoryLocalStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_enforces_quota() {
        let store = MemoryLocalStore::with_quota(10);
        store.set("k", "12345").unwrap();

        // Overwriting the same key only counts the new value.
        store.set("k", "123456789").unwrap();

        let err = store.set("other", "xxxxxxxx").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10, .. }));
        assert_eq!(store.get("other").unwrap(), None);

        store.set_quota(None);
        store.set("other", "xxxxxxxx").unwrap();
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileLocalStore::open(dir.path().join("data")).unwrap();
        store.set(CONTENT_KEY, "{\"blocks\":[]}").unwrap();

        let reopened = FileLocalStore::open(dir.path().join("data")).unwrap();
        assert_eq!(
            reopened.get(CONTENT_KEY).unwrap().as_deref(),
            Some("{\"blocks\":[]}")
        );
        assert_eq!(reopened.get(HISTORY_KEY).unwrap(), None);

        reopened.remove(CONTENT_KEY).unwrap();
        reopened.remove(CONTENT_KEY).unwrap();
        assert_eq!(store.get(CONTENT_KEY).unwrap(), None);
    }

    #[test]
    fn concurrent_file_writes_of_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = &FileLocalStore::open(dir.path()).unwrap();
        let values: Vec<String> = (0..4u8)
            .map(|i| char::from(b'a' + i).to_string().repeat(4096))
            .collect();

        for _ in 0..50 {
            std::thread::scope(|scope| {
                let handles: Vec<_> = values
                    .iter()
                    .map(|value| scope.spawn(move || store.set(CONTENT_KEY, value)))
                    .collect();
                for handle in handles {
                    handle.join().unwrap().unwrap();
                }
            });

            let stored = store.get(CONTENT_KEY).unwrap().unwrap();
            assert!(values.contains(&stored));
        }

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
