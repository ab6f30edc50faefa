//! Request and Response models for the relief cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GeocodeRequest, SetRequest, SocialMediaQuery, VerifyImageRequest};
pub use responses::{
    DeleteResponse, GeocodeResponse, GetResponse, HealthResponse, SetResponse, SocialMediaResponse,
    StatsResponse, SweepResponse, VerifyImageResponse,
};
