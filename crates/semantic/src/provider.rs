use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{EmbedRequest, EmbeddingVector};

/// External embedding service boundary.
///
/// Implementations embed exactly one batch per call and return one vector per
/// input text, in input order. They may fail transiently or permanently;
/// splitting into batches and validating the answer is the job of
/// [`EmbeddingClient`](crate::EmbeddingClient).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(
        &self,
        request: EmbedRequest<'_>,
    ) -> Result<Vec<EmbeddingVector>, ProviderError>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}
