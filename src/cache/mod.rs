//! Cache Module
//!
//! Cache-aside layer with TTL expiration in front of expensive or
//! rate-limited computations.

mod clock;
mod entry;
mod file_store;
mod keys;
mod manager;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use file_store::FileStore;
pub use keys::CacheKey;
pub use manager::CacheManager;
pub use stats::CacheStats;
pub use store::{CacheStore, MemoryStore};

// == Public Constants ==
/// Default TTL in seconds when configuration does not override it
pub const DEFAULT_TTL: u64 = 3600;

/// TTL for results derived from free text (location extraction, social feeds)
pub const TEXT_TTL: u64 = 1800;

/// TTL for image verification verdicts
pub const IMAGE_TTL: u64 = 3600;

/// TTL for geocoding results
pub const GEOCODE_TTL: u64 = 86400;

/// Default interval in seconds between expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL: u64 = 3600;
