//! Request DTOs for the relief cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for storing a cache entry (PUT /cache)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Any JSON payload
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key).or_else(|| match self.ttl {
            Some(0) => Some("TTL must be greater than zero".to_string()),
            _ => None,
        })
    }
}

/// Checks a raw key supplied by an HTTP client.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for POST /geocode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl GeocodeRequest {
    /// Returns an error message when neither field carries text.
    pub fn validate(&self) -> Option<String> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        if present(&self.description) || present(&self.location_name) {
            None
        } else {
            Some("description or location_name is required".to_string())
        }
    }
}

/// Request body for POST /disasters/{id}/verify-image
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyImageRequest {
    #[serde(default)]
    pub image_url: String,
}

/// Query string for GET /disasters/{id}/social-media
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialMediaQuery {
    /// Comma-separated keywords
    #[serde(default)]
    pub keywords: Option<String>,
}

impl SocialMediaQuery {
    pub fn keywords(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}
