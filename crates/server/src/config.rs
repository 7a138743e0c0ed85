use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. Covers the embedding round trips of a
    /// whole match request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Rate limit: requests per minute per API key
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// API keys for authentication
    #[serde(default)]
    pub api_keys: HashSet<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pipeline YAML (normalizer, embedding, matcher sections). Defaults
    /// apply when unset.
    #[serde(default)]
    pub pipeline_config: Option<PathBuf>,

    /// Use the offline stub embedding provider instead of a remote API.
    #[serde(default)]
    pub use_stub_provider: bool,

    /// Candidates returned per inquiry when a request does not say.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            api_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            pipeline_config: None,
            use_stub_provider: false,
            default_top_k: default_top_k(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `server.*` and `PRICEMATCH_SERVER__*`
    /// environment variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("PRICEMATCH_SERVER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api_keys")
                    .try_parsing(true),
            );

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        // Development fallback so a fresh checkout answers requests.
        if config.api_keys.is_empty() {
            tracing::warn!("No API keys configured, using demo key 'demo-key-12345'");
            config.api_keys.insert("demo-key-12345".to_string());
        }

        if config.default_top_k == 0 {
            anyhow::bail!("default_top_k must be >= 1");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_rate_limit_per_minute() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_k() -> usize {
    4
}
