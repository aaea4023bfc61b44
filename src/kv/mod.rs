//! Key-value persistence for saved runs
//!
//! The laboratory core does not own a storage format. Hosts plug in any
//! byte-oriented key-value backend through [`KvStore`]; [`RunArchive`]
//! stores sessions in it as the same JSON document the export produces.
//!
//! # Example
//!
//! ```rust,no_run
//! use physlab::kv::{KvStore, MemoryKvStore};
//!
//! # async fn example() -> physlab::Result<()> {
//! let store = MemoryKvStore::new();
//! store.set("ps_session:demo", b"{}".to_vec()).await?;
//! assert!(store.exists("ps_session:demo").await?);
//! store.delete("ps_session:demo").await?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod memory;

pub use archive::{session_key, RunArchive, SESSION_KEY_PREFIX};
pub use memory::MemoryKvStore;

use crate::Result;
use std::future::Future;

/// Async byte store keyed by string.
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Set a value for a key, overwriting any existing value.
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key. No-op if the key doesn't exist.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_kv_set_get() {
        let store = MemoryKvStore::new();

        store.set("key1", b"value1".to_vec()).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_kv_overwrite_and_delete() {
        let store = MemoryKvStore::new();

        store.set("key", b"v1".to_vec()).await.unwrap();
        store.set("key", b"v2".to_vec()).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some(b"v2".to_vec()));

        store.delete("key").await.unwrap();
        assert!(!store.exists("key").await.unwrap());

        // Deleting again is fine
        store.delete("key").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_kv_concurrent_sessions() {
        use std::sync::Arc;

        let store = Arc::new(MemoryKvStore::new());
        let mut handles = vec![];

        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let key = session_key(&format!("exp{i}"));
                store.set(&key, format!("{i}").into_bytes()).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 20);
        assert_eq!(
            store.get("ps_session:exp7").await.unwrap(),
            Some(b"7".to_vec())
        );
    }

    #[tokio::test]
    async fn test_memory_kv_clear() {
        let store = MemoryKvStore::with_capacity(4);

        store.set("a", b"1".to_vec()).await.unwrap();
        store.set(&session_key("meter-bridge"), b"2".to_vec()).await.unwrap();
        store.set(&session_key("galvanometer"), b"3".to_vec()).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.session_ids(), vec!["galvanometer", "meter-bridge"]);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
