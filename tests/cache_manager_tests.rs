//! Integration Tests for the cache manager over real stores
//!
//! Exercises the manager through the public API with both the in-memory
//! and the file-backed store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use relief_cache::cache::{CacheManager, CacheStore, FileStore, ManualClock, MemoryStore, GEOCODE_TTL};
use relief_cache::services::{Coordinates, GeocodingService};
use serde_json::json;
use tempfile::tempdir;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
    ))
}

// == Concurrency ==

#[tokio::test]
async fn test_concurrent_misses_converge_on_one_entry() {
    let store = Arc::new(MemoryStore::new());
    let manager = CacheManager::new(store.clone(), 3600);
    let calls = AtomicUsize::new(0);

    let slow = || {
        let calls = &calls;
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>(json!({"answer": 42}))
        }
    };

    let (a, b) = tokio::join!(
        manager.compute_if_absent("k", None, slow()),
        manager.compute_if_absent("k", None, slow()),
    );

    assert_eq!(a.unwrap(), json!({"answer": 42}));
    assert_eq!(b.unwrap(), json!({"answer": 42}));
    // Without single-flight both producers may run
    assert!((1..=2).contains(&calls.load(Ordering::SeqCst)));
    assert_eq!(store.len().await.unwrap(), 1);

    // Later calls are served from the cache
    let c: serde_json::Value = manager
        .compute_if_absent("k", None, || async { Err::<serde_json::Value, _>("unused".to_string()) })
        .await
        .unwrap();
    assert_eq!(c["answer"], 42);
}

// == Expiry ==

#[tokio::test]
async fn test_geocode_result_expires_after_a_day() {
    let clock = clock();
    let manager = Arc::new(CacheManager::with_clock(
        Arc::new(MemoryStore::new()),
        clock.clone(),
        3600,
    ));
    let geocoding = GeocodingService::new(manager.clone(), Duration::from_secs(1));

    let coords = geocoding.geocode("Manhattan, NYC").await.unwrap();
    assert_eq!(coords.lat, 40.7831);

    clock.advance(GEOCODE_TTL as i64 - 1);
    let _ = geocoding.geocode("Manhattan, NYC").await.unwrap();
    assert_eq!(manager.stats().computations, 1);

    clock.advance(2);
    let again = geocoding.geocode("Manhattan, NYC").await.unwrap();
    assert_eq!(again, coords);
    assert_eq!(manager.stats().computations, 2);
    assert_eq!(manager.stats().expired, 1);
}

// == Durability ==

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let clock = clock();

    {
        let store = Arc::new(FileStore::open(&path).await.unwrap());
        let manager = CacheManager::with_clock(store, clock.clone(), 3600);
        let coords = Coordinates {
            lat: 40.6782,
            lng: -73.9442,
            service: "mock".to_string(),
            formatted_address: "Brooklyn, NYC".to_string(),
        };
        manager
            .set("geocode:brooklyn", serde_json::to_value(&coords).unwrap(), None)
            .await
            .unwrap();
        manager
            .set("short", json!("soon gone"), Some(10))
            .await
            .unwrap();
    }

    let store = Arc::new(FileStore::open(&path).await.unwrap());
    assert_eq!(store.len().await.unwrap(), 2);

    let manager = CacheManager::with_clock(store.clone(), clock.clone(), 3600);
    let coords: Coordinates = manager
        .compute_if_absent("geocode:brooklyn", None, || async {
            Err::<Coordinates, _>("should be cached".to_string())
        })
        .await
        .unwrap();
    assert_eq!(coords.formatted_address, "Brooklyn, NYC");

    // Expiry is absolute, so it holds across the restart
    clock.advance(11);
    assert_eq!(manager.get("short").await, None);
    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sweep_persists_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let clock = clock();

    let store = Arc::new(FileStore::open(&path).await.unwrap());
    let manager = CacheManager::with_clock(store, clock.clone(), 3600);
    manager.set("a", json!(1), Some(5)).await.unwrap();
    manager.set("b", json!(2), Some(500)).await.unwrap();

    clock.advance(6);
    assert_eq!(manager.sweep().await.unwrap(), 1);

    let reopened = FileStore::open(&path).await.unwrap();
    assert!(reopened.get("a").await.unwrap().is_none());
    assert!(reopened.get("b").await.unwrap().is_some());
}
