//! Cache Entry Module
//!
//! Defines the persisted record for a single cached value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// One stored row: `{key, value, expires_at}` with `expires_at` as ISO-8601.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Caller-derived key, unique within a store
    pub key: String,
    /// Cached payload, may be `null`
    pub value: Value,
    /// Instant after which the entry must not be served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` after `now`.
    pub fn new(key: impl Into<String>, value: Value, now: DateTime<Utc>, ttl_seconds: u64) -> Self {
        Self {
            key: key.into(),
            value,
            expires_at: expiry_after(now, ttl_seconds),
        }
    }

    // == Is Expired ==
    /// Checks if the entry is dead at `now`.
    ///
    /// Boundary condition: an entry whose `expires_at` equals `now` is
    /// already expired, so a TTL that has fully elapsed is never served.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns the remaining lifetime in whole seconds, 0 once expired.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}

// == Utility Functions ==
/// Absolute expiry for a TTL, saturating at the maximum representable time.
pub fn expiry_after(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
