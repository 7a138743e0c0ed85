use crate::error::ServerResult;
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "pricematch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// The pipeline is built before the listener binds, so a running server is
/// ready. The provider name tells operators whether the stub is active.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "status": "ready",
        "service": "pricematch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "api": "ready",
            "embedding_provider": state.pipeline.embedder().provider_name(),
        }
    })))
}

/// Server metadata endpoint (authenticated)
pub async fn server_metadata(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let embedder = state.pipeline.embedder();
    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        provider: embedder.provider_name().to_string(),
        model: state.model_name.clone(),
        dimension: embedder.dimension(),
        max_batch_size: embedder.max_batch_size(),
        default_top_k: state.config.default_top_k,
    };

    Ok(Json(serde_json::to_value(metadata)?))
}
