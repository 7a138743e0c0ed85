//! pricematch server: HTTP API for semantic pricelist matching.
//!
//! Wraps the [`pricematch::Pipeline`] behind an axum router. The pipeline
//! (normalizer, embedding client, matcher) is built once at startup and
//! shared by every request; each request brings its own pricelist and
//! inquiry rows.
//!
//! # API Endpoints
//!
//! ## Public (no authentication)
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe, names the embedding provider
//!
//! ## Protected (API key in `X-API-Key` or `Authorization: Bearer`)
//!
//! - `POST /api/v1/match` - Price inquiry rows against a pricelist
//! - `GET /api/v1/metadata` - Model, dimension and batch settings
//!
//! # Configuration
//!
//! [`ServerConfig::load`] reads an optional `server.{toml,yaml,json}` file
//! and `PRICEMATCH_SERVER__*` environment variables
//! (`PRICEMATCH_SERVER__PORT=9000`, `PRICEMATCH_SERVER__API_KEYS=a,b`).
//! The embedding key comes from `PRICEMATCH_API_KEY` or `COHERE_API_KEY`.
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
