use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{ApiProvider, EmbeddingConfig};
use crate::error::{ProviderError, SemanticError};
use crate::provider::EmbeddingProvider;
use crate::retry::{execute_with_retry, is_retryable_status, RetryConfig};
use crate::types::{EmbedRequest, EmbeddingRole, EmbeddingVector};

const ERROR_BODY_PREVIEW: usize = 300;

/// Remote embedding provider over HTTPS.
///
/// Holds one pooled `reqwest::Client`; construct it once and share it.
/// Transient failures (timeouts, connection errors, 408/429/5xx) are retried
/// according to the configured [`RetryConfig`]; everything else fails the
/// batch on the first attempt.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    http: reqwest::Client,
    kind: ApiProvider,
    url: String,
    api_key: Option<String>,
    model: String,
    retry: RetryConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self, SemanticError> {
        if cfg.provider == ApiProvider::Stub {
            return Err(SemanticError::InvalidConfig(
                "HTTP provider cannot be built from a stub config".into(),
            ));
        }
        cfg.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            kind: cfg.provider,
            url: cfg.endpoint()?.to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model_name.clone(),
            retry: cfg.retry.unwrap_or_else(RetryConfig::disabled),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    async fn send_once(&self, payload: &Value) -> Result<Value, ProviderError> {
        let mut request = self.http.post(&self.url).json(payload);
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            let message = format!("HTTP error {status}: {preview}");
            return Err(if is_retryable_status(status.as_u16()) {
                ProviderError::transient(message)
            } else {
                ProviderError::permanent(message)
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::permanent(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_batch(
        &self,
        request: EmbedRequest<'_>,
    ) -> Result<Vec<EmbeddingVector>, ProviderError> {
        let payload = build_payload(
            self.kind,
            &self.model,
            request.texts,
            request.role,
            request.dimension,
        );

        let outcome = execute_with_retry(&self.retry, ProviderError::is_transient, |_| {
            self.send_once(&payload)
        })
        .await;

        debug!(
            provider = self.name(),
            batch = request.batch_index,
            attempts = outcome.attempts,
            elapsed_ms = outcome.total_duration.as_millis() as u64,
            "embedding request completed"
        );

        parse_embeddings_from_value(outcome.into_result()?)
    }

    fn name(&self) -> &str {
        match self.kind {
            ApiProvider::Cohere => "cohere",
            ApiProvider::OpenAi => "openai",
            ApiProvider::Custom => "custom",
            ApiProvider::Stub => "stub",
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ProviderError::transient(format!("HTTP request failed: {err}"))
    } else {
        ProviderError::permanent(format!("HTTP request failed: {err}"))
    }
}

pub(crate) fn build_payload(
    kind: ApiProvider,
    model: &str,
    texts: &[String],
    role: EmbeddingRole,
    dimension: usize,
) -> Value {
    match kind {
        ApiProvider::Cohere => json!({
            "model": model,
            "texts": texts,
            "input_type": role,
            "output_dimension": dimension,
            "embedding_types": ["float"],
        }),
        ApiProvider::OpenAi => json!({
            "model": model,
            "input": texts,
            "dimensions": dimension,
        }),
        ApiProvider::Custom | ApiProvider::Stub => json!({
            "model": model,
            "texts": texts,
            "role": role,
            "dimension": dimension,
        }),
    }
}

/// Accepts Cohere v2 (`embeddings.float`), Cohere v1 / custom (`embeddings`
/// as array), OpenAI (`data[].embedding`, reordered by `index`) and bare
/// arrays of vectors.
pub(crate) fn parse_embeddings_from_value(
    value: Value,
) -> Result<Vec<EmbeddingVector>, ProviderError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return match embeddings {
                    Value::Object(mut by_type) => match by_type.remove("float") {
                        Some(floats) => parse_embedding_collection(floats),
                        None => Err(ProviderError::permanent(
                            "`embeddings` object has no `float` entry",
                        )),
                    },
                    other => parse_embedding_collection(other),
                };
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return parse_data_items(items);
            }

            Err(ProviderError::permanent("unsupported API response shape"))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_data_items(items: Vec<Value>) -> Result<Vec<EmbeddingVector>, ProviderError> {
    let mut indexed = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let Value::Object(mut obj) = item else {
            return Err(ProviderError::permanent(
                "unexpected entry inside `data` array",
            ));
        };
        let embedding = obj
            .remove("embedding")
            .ok_or_else(|| ProviderError::permanent("missing `embedding` field in data item"))?;
        let index = obj
            .get("index")
            .and_then(Value::as_u64)
            .map(|i| i as usize)
            .unwrap_or(position);
        indexed.push((index, parse_embedding_vector(embedding)?));
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}

fn parse_embedding_collection(value: Value) -> Result<Vec<EmbeddingVector>, ProviderError> {
    match value {
        Value::Array(items) => items.into_iter().map(parse_embedding_vector).collect(),
        other => Err(ProviderError::permanent(format!(
            "embeddings must be an array of vectors, got {other}"
        ))),
    }
}

fn parse_embedding_vector(value: Value) -> Result<EmbeddingVector, ProviderError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .ok_or_else(|| ProviderError::permanent("non-finite embedding value")),
                other => Err(ProviderError::permanent(format!(
                    "embedding entries must be numbers, got {other}"
                ))),
            })
            .collect(),
        other => Err(ProviderError::permanent(format!(
            "embedding vector must be an array, got {other}"
        ))),
    }
}
