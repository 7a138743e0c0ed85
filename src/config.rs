//! YAML configuration file support.
//!
//! One file describes every stage of a run: normalizer rules, the embedding
//! provider, matching options and pipeline scheduling.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Pricematch configuration
//! version: "1.0"
//! name: "site-boq"
//!
//! normalizer:
//!   version: 1
//!   include_builtin_rules: true
//!   extra_rules:
//!     - { from: "nos.", to: "nos" }
//!
//! embedding:
//!   provider: cohere
//!   model_name: "embed-v4.0"
//!   dimension: 1536
//!   max_batch_size: 96
//!   timeout_secs: 60
//!   retry:
//!     max_retries: 3
//!     base_delay_ms: 200
//!     max_delay_ms: 10000
//!     jitter: true
//!
//! matcher:
//!   top_k: 1
//!
//! pipeline:
//!   concurrent_roles: false
//! ```
//!
//! Keep the provider API key out of the file; [`PricematchConfig::apply_env`]
//! pulls it from `PRICEMATCH_API_KEY` (or `COHERE_API_KEY`).

use std::fs;
use std::path::Path;

use canonical::{Normalizer, NormalizerConfig};
use matcher::MatcherConfig;
use semantic::{ApiProvider, EmbeddingConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variables consulted for the provider key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["PRICEMATCH_API_KEY", "COHERE_API_KEY"];

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for a pricematch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PricematchConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub pipeline: PipelineYamlConfig,
}

/// Scheduling options for [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineYamlConfig {
    /// Embed pricelist and inquiry sets concurrently instead of one after
    /// the other. Results are identical either way.
    #[serde(default)]
    pub concurrent_roles: bool,
}

impl PricematchConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PricematchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML. The API key is never written.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        Normalizer::new(&self.normalizer)
            .map_err(|e| ConfigLoadError::Validation(format!("normalizer: {e}")))?;
        self.embedding
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("embedding: {e}")))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;

        Ok(())
    }

    /// Fills `embedding.api_key` from the process environment when it is not
    /// already set.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.embedding.api_key.is_some() {
            return;
        }
        self.embedding.api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());
    }

    /// Switches the embedding provider to the offline stub, keeping the
    /// configured dimension and batch size.
    pub fn use_stub_provider(&mut self) {
        self.embedding.provider = ApiProvider::Stub;
        self.embedding.retry = None;
    }

    /// Whether a remote provider is configured without any credential.
    pub fn missing_api_key(&self) -> bool {
        self.embedding.provider != ApiProvider::Stub && self.embedding.api_key.is_none()
    }
}

impl Default for PricematchConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalizer: NormalizerConfig::default(),
            embedding: EmbeddingConfig::default(),
            matcher: MatcherConfig::default(),
            pipeline: PipelineYamlConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let cfg = PricematchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.embedding.max_batch_size, 96);
        assert_eq!(cfg.embedding.dimension, 1536);
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let cfg = PricematchConfig::from_yaml("version: \"1.0\"\n").unwrap();
        assert_eq!(cfg, PricematchConfig::default());
    }

    #[test]
    fn full_yaml_parses() {
        let yaml = r#"
version: "1.0"
name: "site-boq"
normalizer:
  extra_rules:
    - { from: "nos.", to: "nos" }
embedding:
  provider: openai
  model_name: "text-embedding-3-small"
  dimension: 512
  max_batch_size: 32
  retry:
    max_retries: 1
    base_delay_ms: 50
    max_delay_ms: 500
    jitter: false
matcher:
  top_k: 3
pipeline:
  concurrent_roles: true
"#;
        let cfg = PricematchConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("site-boq"));
        assert_eq!(cfg.normalizer.extra_rules.len(), 1);
        assert_eq!(cfg.embedding.provider, ApiProvider::OpenAi);
        assert_eq!(cfg.embedding.max_batch_size, 32);
        assert_eq!(cfg.embedding.retry.map(|r| r.max_retries), Some(1));
        assert_eq!(cfg.matcher.top_k, 3);
        assert!(cfg.pipeline.concurrent_roles);
    }

    #[test]
    fn unsupported_version_rejected() {
        let err = PricematchConfig::from_yaml("version: \"2.0\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn invalid_stage_configs_rejected() {
        let growing_rule = "version: \"1\"\nnormalizer:\n  extra_rules:\n    - { from: \"kg\", to: \"kilogram\" }\n";
        assert!(matches!(
            PricematchConfig::from_yaml(growing_rule),
            Err(ConfigLoadError::Validation(msg)) if msg.starts_with("normalizer")
        ));

        let zero_batch = "version: \"1\"\nembedding:\n  max_batch_size: 0\n";
        assert!(matches!(
            PricematchConfig::from_yaml(zero_batch),
            Err(ConfigLoadError::Validation(msg)) if msg.starts_with("embedding")
        ));

        let zero_top_k = "version: \"1\"\nmatcher:\n  top_k: 0\n";
        assert!(PricematchConfig::from_yaml(zero_top_k).is_err());
    }

    #[test]
    fn api_key_from_env_with_fallback() {
        let env: HashMap<&str, &str> = [("COHERE_API_KEY", "co-fallback")].into_iter().collect();
        let mut cfg = PricematchConfig::default();
        assert!(cfg.missing_api_key());
        cfg.apply_env_with(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.embedding.api_key.as_deref(), Some("co-fallback"));
        assert!(!cfg.missing_api_key());

        let env: HashMap<&str, &str> = [
            ("PRICEMATCH_API_KEY", "pm-primary"),
            ("COHERE_API_KEY", "co-fallback"),
        ]
        .into_iter()
        .collect();
        let mut cfg = PricematchConfig::default();
        cfg.apply_env_with(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.embedding.api_key.as_deref(), Some("pm-primary"));
    }

    #[test]
    fn explicit_key_not_overridden() {
        let mut cfg = PricematchConfig::default();
        cfg.embedding.api_key = Some("explicit".into());
        cfg.apply_env_with(|_| Some("env".into()));
        assert_eq!(cfg.embedding.api_key.as_deref(), Some("explicit"));
    }

    #[test]
    fn key_never_serialized() {
        let mut cfg = PricematchConfig::default();
        cfg.embedding.api_key = Some("secret-key".into());
        assert!(!cfg.to_yaml().unwrap().contains("secret-key"));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricematch.yaml");
        std::fs::write(&path, "version: \"1.0\"\nmatcher:\n  top_k: 2\n").unwrap();
        assert_eq!(PricematchConfig::from_file(&path).unwrap().matcher.top_k, 2);
        assert!(matches!(
            PricematchConfig::from_file(dir.path().join("nope.yaml")),
            Err(ConfigLoadError::FileRead(_))
        ));
    }
}
