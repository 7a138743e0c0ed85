//! Pricematch embedding client adapter.
//!
//! Turns normalized descriptions into dense vectors by calling an external
//! embedding service. The adapter is role-aware (pricelist entries are
//! embedded as documents, inquiry lines as queries) and batches requests so
//! a large pricelist never exceeds the provider's per-request limit.
//!
//! We support a few providers:
//!
//! - **Cohere** - `/v2/embed` with `embed-v4.0` (the default)
//! - **OpenAI** - any `/v1/embeddings` compatible endpoint
//! - **Custom** - a simple `{"texts": [...]}` contract for self-hosted models
//! - **Stub** - offline, deterministic vectors for dry runs and tests
//!
//! ## Guarantees
//!
//! - One output vector per input text, same order, across batch boundaries.
//! - Every vector has the configured dimension, or the call fails.
//! - A failing batch aborts the call with its batch index and item range.
//!   Transient HTTP failures are retried inside the HTTP provider only.
//!
//! ## Quick example
//!
//! ```rust
//! use semantic::{EmbeddingClient, EmbeddingConfig, EmbeddingRole};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EmbeddingClient::from_config(&EmbeddingConfig::stub(16)).unwrap();
//!     let texts = vec!["steel rebar 12mm".to_string()];
//!     let vectors = client.embed(&texts, EmbeddingRole::Query).await.unwrap();
//!     assert_eq!(vectors[0].len(), 16);
//! }
//! ```

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

mod api;
mod client;
mod provider;
mod stub;

pub use crate::api::HttpEmbeddingProvider;
pub use crate::client::{batch_ranges, BatchObserver, EmbeddingClient};
pub use crate::config::{
    ApiProvider, EmbeddingConfig, DEFAULT_DIMENSION, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MODEL,
};
pub use crate::error::{FailureKind, ProviderError, SemanticError};
pub use crate::provider::EmbeddingProvider;
pub use crate::retry::RetryConfig;
pub use crate::stub::{stub_vector, StubEmbeddingProvider};
pub use crate::types::{BatchProgress, BatchStage, EmbedRequest, EmbeddingRole, EmbeddingVector};
