//! Cache Manager Module
//!
//! Policy layer over a `CacheStore`: TTL bookkeeping, lazy expiration and
//! the compute-if-absent wrapper used by every expensive caller.
//!
//! The cache is best-effort. Storage failures are logged and degraded
//! (reads become misses, writes become no-ops) and never reach the caller
//! of `compute_if_absent`. Producer failures always do.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, CacheStore, Clock, SystemClock};
use crate::error::StorageResult;

// == Cache Manager ==
/// Shared entry point for cached computations.
///
/// Concurrent misses on the same key are not coalesced: each caller runs
/// its producer and the last write wins. Producers are expected to be pure
/// functions of the inputs encoded in the key.
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    /// TTL in seconds applied when a caller passes `None`
    default_ttl: u64,
    stats: StatsRecorder,
}

impl CacheManager {
    // == Constructor ==
    /// Creates a manager over `store` using wall-clock time.
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: u64) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), default_ttl)
    }

    /// Creates a manager with an explicit time source.
    pub fn with_clock(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, default_ttl: u64) -> Self {
        Self {
            store,
            clock,
            default_ttl,
            stats: StatsRecorder::default(),
        }
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Backing store, for inspection.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Get ==
    /// Returns the live value for `key`, if any.
    ///
    /// An entry whose expiry has been reached is deleted (best-effort) and
    /// reported as a miss. A failing store is also reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entry = match self.store.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.stats.record_miss();
                return None;
            }
            Err(e) => {
                warn!("Cache get failed for key {}: {}", key, e);
                self.stats.record_storage_error();
                self.stats.record_miss();
                return None;
            }
        };

        if entry.is_expired_at(self.clock.now()) {
            debug!("Cache entry expired for key: {}", key);
            self.stats.record_expired();
            self.stats.record_miss();
            // Ignored: the sweep reclaims the row if this delete fails
            let _ = self.delete(key).await;
            return None;
        }

        debug!("Cache hit for key: {}", key);
        self.stats.record_hit();
        Some(entry.value)
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` seconds (default TTL if `None`).
    ///
    /// The failure is logged here; callers may discard the returned result.
    pub async fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> StorageResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(key, value, self.clock.now(), ttl);
        let expires_at = entry.expires_at;

        match self.store.put(entry).await {
            Ok(()) => {
                debug!("Cache set for key: {}, expires: {}", key, expires_at);
                self.stats.record_write();
                Ok(())
            }
            Err(e) => {
                warn!("Cache set failed for key {}: {}", key, e);
                self.stats.record_storage_error();
                Err(e)
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        match self.store.delete(key).await {
            Ok(()) => {
                debug!("Cache deleted for key: {}", key);
                Ok(())
            }
            Err(e) => {
                warn!("Cache delete failed for key {}: {}", key, e);
                self.stats.record_storage_error();
                Err(e)
            }
        }
    }

    // == Sweep ==
    /// Physically removes every entry that expired before now.
    pub async fn sweep(&self) -> StorageResult<usize> {
        let removed = self.store.delete_expired(self.clock.now()).await.map_err(|e| {
            self.stats.record_storage_error();
            e
        })?;
        self.stats.record_swept(removed);
        Ok(removed)
    }

    // == Compute If Absent ==
    /// Returns the cached value for `key`, or runs `producer` and caches
    /// its result for `ttl` seconds.
    ///
    /// - A hit never invokes `producer`.
    /// - A producer error is returned unchanged and nothing is cached.
    /// - A cached value that no longer decodes as `T` counts as a miss.
    pub async fn compute_if_absent<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<u64>,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            match serde_json::from_value::<T>(value) {
                Ok(cached) => return Ok(cached),
                Err(e) => warn!("Discarding undecodable cache entry for key {}: {}", key, e),
            }
        }

        self.stats.record_computation();
        let result = producer().await?;

        match serde_json::to_value(&result) {
            Ok(value) => {
                // Best-effort write: the caller gets `result` either way
                let _ = self.set(key, value, ttl).await;
            }
            Err(e) => {
                warn!("Cannot serialize result for key {}: {}", key, e);
                self.stats.record_storage_error();
            }
        }

        Ok(result)
    }
}
