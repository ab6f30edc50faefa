//! Location extraction from free-text disaster descriptions.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tracing::info;

use super::{bounded, ProducerError};
use crate::cache::{CacheKey, CacheManager, TEXT_TTL};

struct LocationPatterns {
    /// "... in Lower East Side, NYC ..." -> capture after the preposition
    preposition: Regex,
    /// "Brooklyn, NYC" anywhere in the text
    place_region: Regex,
}

static PATTERNS: OnceLock<LocationPatterns> = OnceLock::new();

fn patterns() -> &'static LocationPatterns {
    PATTERNS.get_or_init(|| LocationPatterns {
        preposition: Regex::new(
            r"\b(?i:in|at|near|around)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:,\s*(?:[A-Z]{2,}|[A-Z][a-z]+))?)",
        )
        .expect("valid preposition pattern"),
        place_region: Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*,\s*(?:[A-Z]{2,}|[A-Z][a-z]+)")
            .expect("valid place pattern"),
    })
}

/// Pulls the most likely location name out of `description`.
pub fn extract_heuristic(description: &str) -> Option<String> {
    let patterns = patterns();

    if let Some(caps) = patterns.preposition.captures(description) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    patterns
        .place_region
        .find(description)
        .map(|m| m.as_str().to_string())
}

// == Location Service ==
#[derive(Clone)]
pub struct LocationService {
    cache: Arc<CacheManager>,
    timeout: Duration,
}

impl LocationService {
    pub fn new(cache: Arc<CacheManager>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Extracts a location name from a description.
    ///
    /// `Ok(None)` means no location could be found; that answer is cached
    /// like any other.
    pub async fn extract_location(&self, description: &str) -> Result<Option<String>, ProducerError> {
        if description.trim().is_empty() {
            return Err(ProducerError::Malformed("description is empty".to_string()));
        }

        let key = CacheKey::derive("location", [description]);
        self.cache
            .compute_if_absent(key.as_str(), Some(TEXT_TTL), || {
                bounded(self.timeout, async move {
                    let location = extract_heuristic(description);
                    if let Some(location) = &location {
                        info!("Location extracted: {} from description", location);
                    }
                    Ok(location)
                })
            })
            .await
    }
}
