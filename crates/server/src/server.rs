//! Server initialization and routing
//!
//! Router setup, the middleware stack and graceful shutdown.

use crate::config::ServerConfig;
use crate::middleware::{api_key_auth, log_requests, request_id};
use crate::routes::{api_info, health, matching, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Public routes: `/`, `/health`, `/ready`.
/// Protected routes (API key): `/api/v1/*`.
///
/// The request id layer is outermost so the logging layer and handlers can
/// see the id.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    let protected_routes = Router::new()
        .route("/api/v1/match", post(matching::match_items))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .route("/api/v1/metadata", get(health::server_metadata))
        .layer(from_fn_with_state(state.clone(), api_key_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the pricematch HTTP server
///
/// Builds the pipeline, binds the configured address and serves until
/// SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let state = Arc::new(ServerState::new(config.clone())?);
    let app = build_router(state.clone());
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        %addr,
        api_keys = config.api_keys.len(),
        provider = state.pipeline.embedder().provider_name(),
        model = %state.model_name,
        "Starting pricematch server"
    );
    tracing::info!(
        timeout_secs = config.timeout_secs,
        max_body_mb = config.max_body_size_mb,
        rate_limit_per_minute = config.rate_limit_per_minute,
        cors = config.enable_cors,
        "Server limits"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
