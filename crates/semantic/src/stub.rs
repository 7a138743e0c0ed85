use async_trait::async_trait;
use fxhash::hash64;

use crate::error::ProviderError;
use crate::provider::EmbeddingProvider;
use crate::types::{EmbedRequest, EmbeddingVector};

/// Deterministic offline provider.
///
/// Generates sinusoid values derived from a hash of each text, so identical
/// text always yields an identical vector regardless of role or batch
/// placement. Useful for dry runs and tests; the vectors carry no meaning.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubEmbeddingProvider;

impl StubEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Vector for `text` with `dimension` components, each in `[-1, 1]`.
pub fn stub_vector(text: &str, dimension: usize) -> EmbeddingVector {
    let h = hash64(text.as_bytes());
    (0..dimension)
        .map(|idx| {
            let mixed = h.rotate_left((idx % 64) as u32) ^ (idx as u64).wrapping_mul(0x9E37_79B9);
            ((mixed % 100_000) as f64 * 0.001).sin()
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed_batch(
        &self,
        request: EmbedRequest<'_>,
    ) -> Result<Vec<EmbeddingVector>, ProviderError> {
        Ok(request
            .texts
            .iter()
            .map(|text| stub_vector(text, request.dimension))
            .collect())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmbeddingRole;

    #[test]
    fn deterministic_per_text() {
        assert_eq!(stub_vector("steel rebar 12mm", 32), stub_vector("steel rebar 12mm", 32));
        assert_ne!(stub_vector("steel rebar 12mm", 32), stub_vector("cement opc 53 grade", 32));
    }

    #[test]
    fn values_in_range_and_not_all_zero() {
        let v = stub_vector("", 128);
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
        assert!(!v.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn role_does_not_change_vectors() {
        let provider = StubEmbeddingProvider::new();
        let texts = vec!["pvc pipe 110mm".to_string()];
        let doc = provider
            .embed_batch(EmbedRequest {
                texts: &texts,
                role: EmbeddingRole::Document,
                dimension: 16,
                batch_index: 0,
            })
            .await
            .unwrap();
        let query = provider
            .embed_batch(EmbedRequest {
                texts: &texts,
                role: EmbeddingRole::Query,
                dimension: 16,
                batch_index: 3,
            })
            .await
            .unwrap();
        assert_eq!(doc, query);
        assert_eq!(doc[0].len(), 16);
    }
}
