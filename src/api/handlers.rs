//! API Handlers
//!
//! HTTP request handlers for the cache administration endpoints and the
//! cached disaster-response computations.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::CacheManager;
use crate::error::{ApiError, Result};
use crate::models::requests::validate_key;
use crate::models::{
    DeleteResponse, GeocodeRequest, GeocodeResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, SocialMediaQuery, SocialMediaResponse, StatsResponse, SweepResponse,
    VerifyImageRequest, VerifyImageResponse,
};
use crate::services::{
    analyze, is_valid_coordinates, GeocodingService, LocationService, ProducerError,
    SocialMediaService, VerificationService,
};

/// Application state shared across all handlers.
///
/// Every service holds the same `CacheManager`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub location: LocationService,
    pub verification: VerificationService,
    pub geocoding: GeocodingService,
    pub social_media: SocialMediaService,
}

impl AppState {
    /// Wires the services around a shared cache manager.
    pub fn new(cache: Arc<CacheManager>, producer_timeout: Duration) -> Self {
        Self {
            location: LocationService::new(cache.clone(), producer_timeout),
            verification: VerificationService::new(cache.clone(), producer_timeout),
            geocoding: GeocodingService::new(cache.clone(), producer_timeout),
            social_media: SocialMediaService::new(cache.clone(), producer_timeout),
            cache,
        }
    }
}

/// Handler for PUT /cache
///
/// A store failure still answers 200 with `stored: false`.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let stored = state.cache.set(&req.key, req.value, req.ttl).await.is_ok();

    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for GET /cache/{key}
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/{key}
///
/// Idempotent: deleting a missing key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    // Failure is already logged by the manager
    let _ = state.cache.delete(&key).await;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /cache/sweep
///
/// Runs one sweep immediately, outside the background schedule.
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let removed = state.cache.sweep().await.unwrap_or(0);
    Json(SweepResponse { removed })
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let total_entries = state.cache.store().len().await.ok();
    Json(StatsResponse::new(state.cache.stats(), total_entries))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for POST /geocode
///
/// Uses `location_name` when given, otherwise extracts one from
/// `description`.
pub async fn geocode_handler(
    State(state): State<AppState>,
    Json(req): Json<GeocodeRequest>,
) -> Result<Json<GeocodeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let location_name = match req.location_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => Some(name),
        None => match req.description.as_deref() {
            Some(description) => state.location.extract_location(description).await?,
            None => None,
        },
    };
    let location_name = location_name
        .ok_or_else(|| ApiError::NotFound("No location could be extracted".to_string()))?;

    let coordinates = state.geocoding.geocode(&location_name).await?;
    if !is_valid_coordinates(coordinates.lat, coordinates.lng) {
        return Err(ProducerError::Upstream(format!(
            "geocoder returned ({}, {})",
            coordinates.lat, coordinates.lng
        ))
        .into());
    }

    info!("Geocoded location: {} -> ({}, {})", location_name, coordinates.lat, coordinates.lng);
    Ok(Json(GeocodeResponse {
        location_name,
        coordinates,
    }))
}

/// Handler for POST /disasters/{id}/verify-image
pub async fn verify_image_handler(
    State(state): State<AppState>,
    Path(disaster_id): Path<String>,
    Json(req): Json<VerifyImageRequest>,
) -> Result<Json<VerifyImageResponse>> {
    if req.image_url.trim().is_empty() {
        return Err(ApiError::InvalidRequest("image_url is required".to_string()));
    }

    let verification = state.verification.verify_image(&req.image_url).await?;
    info!(
        "Image verification for disaster {}: authentic={}",
        disaster_id, verification.authentic
    );

    Ok(Json(VerifyImageResponse {
        disaster_id,
        verification,
    }))
}

/// Handler for GET /disasters/{id}/social-media
pub async fn social_media_handler(
    State(state): State<AppState>,
    Path(disaster_id): Path<String>,
    Query(query): Query<SocialMediaQuery>,
) -> Result<Json<SocialMediaResponse>> {
    let feed = state
        .social_media
        .reports(&disaster_id, &query.keywords())
        .await?;
    let analysis = analyze(&feed.reports);

    Ok(Json(SocialMediaResponse {
        disaster_id,
        feed,
        analysis,
    }))
}
