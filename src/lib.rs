//! Relief Cache - TTL cache for disaster-response computations
//!
//! Memoizes expensive or rate-limited lookups (location extraction, image
//! verification, geocoding, social media feeds) behind a pluggable store,
//! with lazy expiry on read and a periodic sweep.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
