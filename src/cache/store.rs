//! Cache Store Module
//!
//! Storage contract consumed by the cache manager, plus an in-memory
//! implementation.
//!
//! Stores keep entries exactly as written. Expiry is enforced by the
//! manager, so `get` returns logically expired entries too.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::StorageResult;

// == Cache Store Trait ==
/// Key-value persistence with expiry metadata.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored entry for `key`, expired or not.
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>>;

    /// Inserts or atomically replaces the entry for `entry.key`.
    async fn put(&self, entry: CacheEntry) -> StorageResult<()>;

    /// Removes `key`. Absent keys are not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Removes every entry with `expires_at < now` and returns how many went.
    async fn delete_expired(&self, now: DateTime<Utc>) -> StorageResult<usize>;

    /// Number of stored entries, expired ones included.
    async fn len(&self) -> StorageResult<usize>;
}

// == Memory Store ==
/// Non-durable store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> StorageResult<()> {
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StorageResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        Ok(before - entries.len())
    }

    async fn len(&self) -> StorageResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_put_and_get() {
        let store = MemoryStore::new();
        let now = Utc::now();

        store.put(CacheEntry::new("key1", json!("value1"), now, 60)).await.unwrap();
        let entry = store.get("key1").await.unwrap().unwrap();

        assert_eq!(entry.value, json!("value1"));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert!(store.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_returns_expired_entries() {
        let store = MemoryStore::new();
        let past = Utc::now() - Duration::hours(2);

        store.put(CacheEntry::new("stale", json!(1), past, 60)).await.unwrap();
        assert!(store.get("stale").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = MemoryStore::new();
        let now = Utc::now();

        store.put(CacheEntry::new("key1", json!("value1"), now, 60)).await.unwrap();
        store.put(CacheEntry::new("key1", json!("value2"), now, 120)).await.unwrap();

        let entry = store.get("key1").await.unwrap().unwrap();
        assert_eq!(entry.value, json!("value2"));
        assert_eq!(entry.expires_at, now + Duration::seconds(120));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_delete_is_idempotent() {
        let store = MemoryStore::new();

        store.put(CacheEntry::new("key1", json!(true), Utc::now(), 60)).await.unwrap();
        store.delete("key1").await.unwrap();
        store.delete("key1").await.unwrap();

        assert!(store.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_delete_expired() {
        let store = MemoryStore::new();
        let now = Utc::now();

        store.put(CacheEntry::new("old", json!(1), now - Duration::seconds(100), 10)).await.unwrap();
        store.put(CacheEntry::new("edge", json!(2), now, 0)).await.unwrap();
        store.put(CacheEntry::new("fresh", json!(3), now, 10)).await.unwrap();

        let removed = store.delete_expired(now).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("edge").await.unwrap().is_some());
        assert!(store.get("fresh").await.unwrap().is_some());
    }
}
