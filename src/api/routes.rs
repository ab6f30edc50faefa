//! API Routes
//!
//! Configures the Axum router with the cache administration and service
//! endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, geocode_handler, get_handler, health_handler, set_handler,
    social_media_handler, stats_handler, sweep_handler, verify_image_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /cache/stats` - Cache counters
/// - `PUT /cache` - Store a key-value pair
/// - `GET /cache/:key` - Retrieve a live value
/// - `DELETE /cache/:key` - Delete a key
/// - `POST /cache/sweep` - Remove expired entries now
/// - `POST /geocode` - Extract and geocode a location
/// - `POST /disasters/:id/verify-image` - Verify an image URL
/// - `GET /disasters/:id/social-media` - Mock social media reports
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments win over `:key`, so /cache/stats and /cache/sweep
    // never reach the key handlers.
    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", put(set_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/sweep", post(sweep_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route("/geocode", post(geocode_handler))
        .route("/disasters/:id/verify-image", post(verify_image_handler))
        .route("/disasters/:id/social-media", get(social_media_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheManager, MemoryStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let cache = Arc::new(CacheManager::new(Arc::new(MemoryStore::new()), 300));
        create_router(AppState::new(cache, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint_not_shadowed_by_key_route() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // A key lookup for "stats" would be a 404
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/cache")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"key":"test","value":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sweep_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cache/sweep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
