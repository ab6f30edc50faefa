//! Services Module
//!
//! Expensive or rate-limited computations fronted by the cache. Each
//! service derives a `CacheKey` from its inputs and goes through
//! `CacheManager::compute_if_absent` with its own TTL.
//!
//! The upstream integrations are mocked with deterministic heuristics, but
//! every computation still runs under a timeout so a stuck upstream only
//! fails the request that triggered it.

mod geocoding;
mod location;
mod social_media;
mod verification;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use geocoding::{distance_km, is_valid_coordinates, Coordinates, GeocodingService};
pub use location::LocationService;
pub use social_media::{
    analyze, Priority, PriorityCount, ReportAnalysis, ReportSummary, Sentiment, SocialMediaFeed,
    SocialMediaReport, SocialMediaService,
};
pub use verification::{ImageVerification, VerificationService};

/// Default bound on a single upstream computation
pub const DEFAULT_PRODUCER_TIMEOUT: Duration = Duration::from_secs(10);

// == Producer Error Enum ==
/// Failure of a wrapped computation. Never cached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProducerError {
    /// Computation did not finish within its bound
    #[error("Computation timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream service failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Input or upstream response could not be interpreted
    #[error("Malformed input: {0}")]
    Malformed(String),
}

/// Runs `computation` under `limit`, mapping elapsed time to `Timeout`.
pub async fn bounded<T, Fut>(limit: Duration, computation: Fut) -> Result<T, ProducerError>
where
    Fut: Future<Output = Result<T, ProducerError>>,
{
    tokio::time::timeout(limit, computation)
        .await
        .map_err(|_| ProducerError::Timeout(limit))?
}
