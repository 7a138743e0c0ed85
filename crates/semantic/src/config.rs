//! Embedding adapter settings.
//!
//! ```rust
//! use semantic::{ApiProvider, EmbeddingConfig};
//!
//! let cfg = EmbeddingConfig {
//!     provider: ApiProvider::Cohere,
//!     api_key: Some("co-xxx".into()),
//!     ..Default::default()
//! };
//! assert_eq!(cfg.endpoint().unwrap(), "https://api.cohere.com/v2/embed");
//! assert_eq!(cfg.max_batch_size, 96);
//! ```

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;
use crate::SemanticError;

pub const DEFAULT_MODEL: &str = "embed-v4.0";
pub const DEFAULT_DIMENSION: usize = 1536;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 96;

const COHERE_EMBED_URL: &str = "https://api.cohere.com/v2/embed";
const OPENAI_EMBED_URL: &str = "https://api.openai.com/v1/embeddings";

/// Request/response shape spoken by the remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// Cohere `/v2/embed`: `texts` + `input_type`, answers `embeddings.float`.
    #[default]
    Cohere,
    /// OpenAI-compatible `/v1/embeddings`: `input`, answers `data[].embedding`.
    OpenAi,
    /// `{"texts", "role", "dimension"}` in, bare array or `embeddings` out.
    Custom,
    /// Offline deterministic vectors; never touches the network.
    Stub,
}

/// Runtime configuration for [`EmbeddingClient`](crate::EmbeddingClient).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ApiProvider,
    /// Endpoint override. Required for [`ApiProvider::Custom`].
    pub api_url: Option<String>,
    /// Bearer token. Usually injected from the environment, never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model_name: String,
    /// Expected vector length; every returned vector is checked against it.
    pub dimension: usize,
    /// Maximum texts per provider request.
    pub max_batch_size: usize,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Transport retry for transient failures. `None` disables retries.
    pub retry: Option<RetryConfig>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ApiProvider::default(),
            api_url: None,
            api_key: None,
            model_name: DEFAULT_MODEL.into(),
            dimension: DEFAULT_DIMENSION,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            timeout_secs: 60,
            connect_timeout_secs: 10,
            retry: Some(RetryConfig::default()),
        }
    }
}

impl EmbeddingConfig {
    /// Offline configuration backed by the deterministic stub provider.
    pub fn stub(dimension: usize) -> Self {
        Self {
            provider: ApiProvider::Stub,
            dimension,
            retry: None,
            ..Self::default()
        }
    }

    /// Resolved endpoint for the configured provider.
    pub fn endpoint(&self) -> Result<&str, SemanticError> {
        if let Some(url) = self.api_url.as_deref() {
            return Ok(url);
        }
        match self.provider {
            ApiProvider::Cohere => Ok(COHERE_EMBED_URL),
            ApiProvider::OpenAi => Ok(OPENAI_EMBED_URL),
            ApiProvider::Custom => Err(SemanticError::InvalidConfig(
                "api_url is required for the custom provider".into(),
            )),
            ApiProvider::Stub => Err(SemanticError::InvalidConfig(
                "the stub provider has no endpoint".into(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than 0".into(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_batch_size must be greater than 0".into(),
            ));
        }
        if self.provider != ApiProvider::Stub {
            self.endpoint()?;
            if self.model_name.trim().is_empty() {
                return Err(SemanticError::InvalidConfig(
                    "model_name must not be empty".into(),
                ));
            }
            if self.timeout_secs == 0 {
                return Err(SemanticError::InvalidConfig(
                    "timeout_secs must be greater than 0".into(),
                ));
            }
        }
        Ok(())
    }
}
