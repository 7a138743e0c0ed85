use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use dashmap::DashMap;
use pricematch::{Pipeline, PricematchConfig};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: API key -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, Instant)>>,

    /// Configured pipeline; requests that override `top_k` work on a clone.
    pub pipeline: Arc<Pipeline>,

    /// Model name reported by the metadata endpoint.
    pub model_name: String,

    pub started_at: Instant,
}

impl ServerState {
    /// Builds the pipeline from `config.pipeline_config` (or defaults) plus
    /// the API key environment variables.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let mut pipeline_cfg = match &config.pipeline_config {
            Some(path) => PricematchConfig::from_file(path)
                .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?,
            None => PricematchConfig::default(),
        };
        pipeline_cfg.apply_env();
        if config.use_stub_provider {
            pipeline_cfg.use_stub_provider();
        }
        if pipeline_cfg.missing_api_key() {
            return Err(ServerError::Config(
                "no embedding API key: set PRICEMATCH_API_KEY or COHERE_API_KEY, \
                 or enable use_stub_provider"
                    .to_string(),
            ));
        }

        let pipeline = Pipeline::from_config(&pipeline_cfg)?;
        Ok(Self::with_pipeline(
            config,
            pipeline,
            pipeline_cfg.embedding.model_name,
        ))
    }

    /// State around an already built pipeline.
    pub fn with_pipeline(
        config: ServerConfig,
        pipeline: Pipeline,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            pipeline: Arc::new(pipeline),
            model_name: model_name.into(),
            started_at: Instant::now(),
        }
    }

    /// Check if API key is valid
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.config.api_keys.contains(key)
    }

    /// Check rate limit for API key
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = std::time::Duration::from_secs(60);
        let limit = self.config.rate_limit_per_minute;

        let mut entry = self.rate_limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Server metadata for the authenticated metadata endpoint
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub provider: String,
    pub model: String,
    pub dimension: usize,
    pub max_batch_size: usize,
    pub default_top_k: usize,
}
