//! API route handlers
//!
//! - `health`: liveness, readiness and server metadata
//! - `matching`: pricelist matching

pub mod health;
pub mod matching;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Root endpoint (GET /), no authentication.
///
/// ```json
/// {
///   "name": "pricematch server",
///   "version": "0.1.0",
///   "api_version": "v1",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "pricematch server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/match",
            "/api/v1/metadata",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
