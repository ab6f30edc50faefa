//! File Store Module
//!
//! Durable `CacheStore` that keeps every row in a single JSON file.
//!
//! The file holds an array of `{key, value, expires_at}` rows. It is read
//! once at open and rewritten after every mutation through a temp file and
//! a rename, so the on-disk snapshot is always a complete one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::cache::{CacheEntry, CacheStore};
use crate::error::{StorageError, StorageResult};

// == File Store ==
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl FileStore {
    // == Open ==
    /// Opens the store at `path`, loading any rows a previous process left.
    ///
    /// A missing file is an empty store; an unreadable one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => {
                let rows: Vec<CacheEntry> = serde_json::from_slice(&bytes)?;
                rows.into_iter().map(|row| (row.key.clone(), row)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Opened cache file {} with {} rows", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    /// Writes a full snapshot of `entries` to disk.
    async fn persist(&self, entries: &HashMap<String, CacheEntry>) -> StorageResult<()> {
        let mut rows: Vec<&CacheEntry> = entries.values().collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        let data = serde_json::to_vec_pretty(&rows)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            error!("Cache file write failed: {}", e);
            StorageError::Io(e)
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            error!("Cache file rename failed: {}", e);
            StorageError::Io(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        let key = entry.key.clone();
        let previous = entries.insert(key.clone(), entry);

        if let Err(e) = self.persist(&entries).await {
            // Roll back so memory never runs ahead of the file
            match previous {
                Some(previous) => entries.insert(key, previous),
                None => entries.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StorageResult<usize> {
        let mut entries = self.entries.write().await;
        let expired: Vec<String> = entries
            .values()
            .filter(|entry| entry.expires_at < now)
            .map(|entry| entry.key.clone())
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let mut removed = Vec::with_capacity(expired.len());
        for key in &expired {
            if let Some(entry) = entries.remove(key) {
                removed.push(entry);
            }
        }

        if let Err(e) = self.persist(&entries).await {
            for entry in removed {
                entries.insert(entry.key.clone(), entry);
            }
            return Err(e);
        }
        Ok(expired.len())
    }

    async fn len(&self) -> StorageResult<usize> {
        Ok(self.entries.read().await.len())
    }
}
