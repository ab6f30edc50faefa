//! API Module
//!
//! HTTP handlers and routing for the relief cache REST API.
//!
//! # Endpoints
//! - `PUT /cache` - Store a key-value pair
//! - `GET /cache/:key` - Retrieve a value by key
//! - `DELETE /cache/:key` - Delete a key
//! - `POST /cache/sweep` - Remove expired entries
//! - `GET /cache/stats` - Get cache statistics
//! - `POST /geocode`, `POST /disasters/:id/verify-image`,
//!   `GET /disasters/:id/social-media` - Cached computations
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
