//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
use crate::services::DEFAULT_PRODUCER_TIMEOUT;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for cache writes that do not pass one
    pub default_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Durable cache file; `None` keeps the cache in memory
    pub store_path: Option<PathBuf>,
    /// Bound on a single upstream computation
    pub producer_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Default TTL in seconds (default: 3600)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_STORE_PATH` - JSON file for the durable store (default: in-memory)
    /// - `PRODUCER_TIMEOUT_MS` - Upstream computation bound (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: parse_var("CACHE_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("CACHE_SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            store_path: env::var("CACHE_STORE_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            producer_timeout: parse_var("PRODUCER_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.producer_timeout),
        }
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            server_port: 3000,
            store_path: None,
            producer_timeout: DEFAULT_PRODUCER_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.sweep_interval, 3600);
        assert_eq!(config.server_port, 3000);
        assert!(config.store_path.is_none());
        assert_eq!(config.producer_timeout, Duration::from_secs(10));
        assert_eq!(config.sweep_period(), Duration::from_secs(3600));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment to avoid races between tests
        env::remove_var("CACHE_TTL");
        env::remove_var("CACHE_SWEEP_INTERVAL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_STORE_PATH");
        env::remove_var("PRODUCER_TIMEOUT_MS");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.server_port, 3000);
        assert!(config.store_path.is_none());

        env::set_var("CACHE_TTL", "1800");
        env::set_var("CACHE_SWEEP_INTERVAL", "0");
        env::set_var("CACHE_STORE_PATH", "/var/lib/relief/cache.json");
        env::set_var("PRODUCER_TIMEOUT_MS", "250");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 1800);
        assert_eq!(config.sweep_interval, 3600, "zero interval falls back to default");
        assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/relief/cache.json")));
        assert_eq!(config.producer_timeout, Duration::from_millis(250));

        env::remove_var("CACHE_TTL");
        env::remove_var("CACHE_SWEEP_INTERVAL");
        env::remove_var("CACHE_STORE_PATH");
        env::remove_var("PRODUCER_TIMEOUT_MS");
    }
}
