//! Error types for the relief cache
//!
//! Storage failures are absorbed by the cache manager; API errors are
//! rendered as JSON bodies by the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::ProducerError;

// == Storage Error Enum ==
/// Failure reported by a backing store.
///
/// Never surfaces to callers of `CacheManager::compute_if_absent`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem failure while reading or writing the durable store
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry or snapshot could not be (de)serialized
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store is unreachable or rejected the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == API Error Enum ==
/// Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrapped computation failed
    #[error("Upstream failure: {0}")]
    Producer(#[from] ProducerError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Producer(ProducerError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Producer(ProducerError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Producer(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result of a backing-store operation.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result of an HTTP handler.
pub type Result<T> = std::result::Result<T, ApiError>;
