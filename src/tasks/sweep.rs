//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries so keys
//! nobody reads again are still reclaimed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::CacheManager;

/// Spawns the sweep loop.
///
/// Every `period` the task asks the manager to delete expired entries. A
/// failed cycle is logged and the loop keeps going. The task exits when
/// `shutdown` is cancelled; awaiting the returned handle then completes.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let handle = spawn_sweep_task(manager.clone(), Duration::from_secs(3600), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweep_task(
    manager: Arc<CacheManager>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {:?}", period);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Cache sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match manager.sweep().await {
                        Ok(0) => debug!("Cache sweep: no expired entries found"),
                        Ok(removed) => info!("Cache sweep: removed {} expired entries", removed),
                        Err(e) => error!("Scheduled cache sweep failed: {}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, CacheStore, ManualClock, MemoryStore};
    use crate::error::{StorageError, StorageResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose sweeps fail a fixed number of times before succeeding.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failures_left: AtomicUsize,
        sweeps: AtomicUsize,
    }

    #[async_trait]
    impl CacheStore for FlakyStore {
        async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
            self.inner.get(key).await
        }
        async fn put(&self, entry: CacheEntry) -> StorageResult<()> {
            self.inner.put(entry).await
        }
        async fn delete(&self, key: &str) -> StorageResult<()> {
            self.inner.delete(key).await
        }
        async fn delete_expired(&self, now: DateTime<Utc>) -> StorageResult<usize> {
            self.sweeps.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(StorageError::Unavailable("timeout".to_string()));
            }
            self.inner.delete_expired(now).await
        }
        async fn len(&self) -> StorageResult<usize> {
            self.inner.len().await
        }
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::default());
        let manager = Arc::new(CacheManager::with_clock(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            3600,
        ));

        manager.set("expire_soon", json!("value"), Some(1)).await.unwrap();
        manager.set("long_lived", json!("value"), Some(3600)).await.unwrap();
        clock.advance(2);

        let shutdown = CancellationToken::new();
        let handle = spawn_sweep_task(manager.clone(), Duration::from_millis(20), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(manager.store().get("expire_soon").await.unwrap().is_none());
        assert!(manager.store().get("long_lived").await.unwrap().is_some());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_survives_failures() {
        let store = Arc::new(FlakyStore::default());
        store.failures_left.store(2, Ordering::SeqCst);
        let clock = Arc::new(ManualClock::default());
        let manager = Arc::new(CacheManager::with_clock(store.clone(), clock.clone(), 3600));

        manager.set("stale", json!(1), Some(1)).await.unwrap();
        clock.advance(5);

        let shutdown = CancellationToken::new();
        let handle = spawn_sweep_task(manager.clone(), Duration::from_millis(20), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert!(store.sweeps.load(Ordering::SeqCst) >= 3, "Loop should keep running after errors");
        assert!(store.get("stale").await.unwrap().is_none());
        assert_eq!(manager.stats().storage_errors, 2);
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_cancel() {
        let manager = Arc::new(CacheManager::new(Arc::new(MemoryStore::new()), 3600));
        let shutdown = CancellationToken::new();

        let handle = spawn_sweep_task(manager, Duration::from_secs(3600), shutdown.clone());
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Task should finish promptly after cancel")
            .unwrap();
    }
}
