use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::HttpEmbeddingProvider;
use crate::config::{ApiProvider, EmbeddingConfig};
use crate::error::SemanticError;
use crate::provider::EmbeddingProvider;
use crate::stub::StubEmbeddingProvider;
use crate::types::{BatchProgress, BatchStage, EmbedRequest, EmbeddingRole, EmbeddingVector};

/// Callback invoked before and after every provider call.
pub type BatchObserver<'a> = &'a (dyn Fn(BatchProgress) + Send + Sync);

/// Batched, order-preserving front end over an [`EmbeddingProvider`].
///
/// `embed` splits its input into consecutive batches of at most
/// `max_batch_size` texts, sends them one after another, validates each
/// answer and concatenates the vectors in request order. There is no retry
/// here and no caching across calls: the first failing batch aborts the
/// call and nothing partial is returned.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    max_batch_size: usize,
    dimension: usize,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("provider", &self.provider.name())
            .field("max_batch_size", &self.max_batch_size)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl EmbeddingClient {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        max_batch_size: usize,
        dimension: usize,
    ) -> Result<Self, SemanticError> {
        if max_batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_batch_size must be greater than 0".into(),
            ));
        }
        if dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than 0".into(),
            ));
        }
        Ok(Self {
            provider,
            max_batch_size,
            dimension,
        })
    }

    /// Builds the provider named by `cfg` (HTTP or stub) and wraps it.
    pub fn from_config(cfg: &EmbeddingConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        let provider: Arc<dyn EmbeddingProvider> = match cfg.provider {
            ApiProvider::Stub => Arc::new(StubEmbeddingProvider::new()),
            _ => Arc::new(HttpEmbeddingProvider::new(cfg)?),
        };
        Self::new(provider, cfg.max_batch_size, cfg.dimension)
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embeds `texts` under `role`. Output has the same length and order as
    /// the input; empty input returns immediately without a provider call.
    pub async fn embed(
        &self,
        texts: &[String],
        role: EmbeddingRole,
    ) -> Result<Vec<EmbeddingVector>, SemanticError> {
        self.embed_with_progress(texts, role, None).await
    }

    /// Same as [`embed`](Self::embed), reporting each batch to `observer`.
    pub async fn embed_with_progress(
        &self,
        texts: &[String],
        role: EmbeddingRole,
        observer: Option<BatchObserver<'_>>,
    ) -> Result<Vec<EmbeddingVector>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let ranges = batch_ranges(texts.len(), self.max_batch_size);
        let batch_count = ranges.len();
        info!(
            provider = self.provider.name(),
            role = %role,
            items = texts.len(),
            batches = batch_count,
            "embedding texts"
        );

        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_index, range) in ranges.into_iter().enumerate() {
            let notify = |stage| {
                if let Some(observer) = observer {
                    observer(BatchProgress {
                        role,
                        stage,
                        batch_index,
                        batch_count,
                        start: range.start,
                        end: range.end,
                    });
                }
            };

            notify(BatchStage::Started);
            debug!(batch = batch_index, start = range.start, end = range.end, "sending batch");

            let batch = self
                .provider
                .embed_batch(EmbedRequest {
                    texts: &texts[range.clone()],
                    role,
                    dimension: self.dimension,
                    batch_index,
                })
                .await
                .map_err(|source| SemanticError::Provider {
                    batch_index,
                    start: range.start,
                    end: range.end,
                    source,
                })?;

            if batch.len() != range.len() {
                return Err(SemanticError::CountMismatch {
                    batch_index,
                    expected: range.len(),
                    actual: batch.len(),
                });
            }
            for (offset, vector) in batch.iter().enumerate() {
                if vector.len() != self.dimension {
                    return Err(SemanticError::DimensionMismatch {
                        item_index: range.start + offset,
                        expected: self.dimension,
                        actual: vector.len(),
                    });
                }
            }

            vectors.extend(batch);
            notify(BatchStage::Finished);
        }

        Ok(vectors)
    }
}

/// Consecutive half-open ranges covering `0..len`, each at most `max` long.
pub fn batch_ranges(len: usize, max: usize) -> Vec<Range<usize>> {
    let max = max.max(1);
    (0..len)
        .step_by(max)
        .map(|start| start..(start + max).min(len))
        .collect()
}
