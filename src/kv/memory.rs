//! Process-local session store on `DashMap`.
//!
//! Archived sessions live only as long as the process. The lab demo and the
//! tests archive runs here; a browser host would swap in a backend over its
//! own local storage.

use super::{KvStore, SESSION_KEY_PREFIX};
use crate::Result;
use dashmap::DashMap;

/// In-memory backend for [`RunArchive`](super::RunArchive).
///
/// Entries are opaque bytes. Several sessions (one per apparatus) can be
/// archived and read back concurrently.
///
/// # Example
///
/// ```rust
/// use physlab::kv::{session_key, KvStore, MemoryKvStore};
///
/// # async fn example() -> physlab::Result<()> {
/// let store = MemoryKvStore::new();
/// store.set(&session_key("potentiometer"), b"{}".to_vec()).await?;
/// assert_eq!(store.session_ids(), vec!["potentiometer".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryKvStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store sized for `sessions` archived experiments.
    #[must_use]
    pub fn with_capacity(sessions: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(sessions),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Experiment ids with an archived session, sorted.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| entry.key().strip_prefix(SESSION_KEY_PREFIX).map(str::to_string))
            .collect();
        ids.sort();
        ids
    }

    /// Forget every archived session.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}
