//! Response DTOs for the relief cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::services::{Coordinates, ImageVerification, ReportAnalysis, SocialMediaFeed};

/// Response body for GET /cache/{key}
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /cache
///
/// `stored` is false when the backing store rejected the write; the request
/// itself still succeeds because the cache is best-effort.
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Human-readable outcome
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Whether the entry reached the store
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' could not be cached", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for DELETE /cache/{key}
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for POST /cache/sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Entries currently stored, absent if the store could not be reached
    pub total_entries: Option<usize>,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, total_entries: Option<usize>) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            stats,
            total_entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for POST /geocode
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResponse {
    pub location_name: String,
    pub coordinates: Coordinates,
}

/// Response body for POST /disasters/{id}/verify-image
#[derive(Debug, Clone, Serialize)]
pub struct VerifyImageResponse {
    pub disaster_id: String,
    pub verification: ImageVerification,
}

/// Response body for GET /disasters/{id}/social-media
#[derive(Debug, Clone, Serialize)]
pub struct SocialMediaResponse {
    pub disaster_id: String,
    #[serde(flatten)]
    pub feed: SocialMediaFeed,
    pub analysis: ReportAnalysis,
}
