use thiserror::Error;

/// How a provider failure should be treated by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeouts, dropped connections, throttling, upstream 5xx.
    Transient,
    /// Bad credentials, malformed requests, unparseable responses.
    Permanent,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transient => f.write_str("transient"),
            FailureKind::Permanent => f.write_str("permanent"),
        }
    }
}

/// Failure reported by an [`EmbeddingProvider`](crate::EmbeddingProvider)
/// for a single batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} provider failure: {message}")]
pub struct ProviderError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Permanent,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

/// Errors surfaced by [`EmbeddingClient::embed`](crate::EmbeddingClient::embed).
///
/// Every batch-level variant names the batch so a failed run can be traced
/// back to the exact slice of input that caused it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SemanticError {
    /// Configuration is inconsistent (zero batch size, missing endpoint, ...).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// The provider failed for one batch; the whole call is aborted.
    #[error("embedding batch {batch_index} (items {start}..{end}) failed: {source}")]
    Provider {
        batch_index: usize,
        start: usize,
        end: usize,
        #[source]
        source: ProviderError,
    },
    /// The provider returned a different number of vectors than texts sent.
    #[error("embedding batch {batch_index} returned {actual} vectors for {expected} texts")]
    CountMismatch {
        batch_index: usize,
        expected: usize,
        actual: usize,
    },
    /// A vector came back with the wrong length.
    #[error("embedding for item {item_index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        item_index: usize,
        expected: usize,
        actual: usize,
    },
}

impl SemanticError {
    /// Batch position for batch-level failures.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            SemanticError::Provider { batch_index, .. }
            | SemanticError::CountMismatch { batch_index, .. } => Some(*batch_index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn provider_error_display() {
        let err = ProviderError::transient("HTTP 503");
        assert_eq!(err.to_string(), "transient provider failure: HTTP 503");
        assert!(err.is_transient());
        assert!(!ProviderError::permanent("HTTP 401").is_transient());
    }

    #[test]
    fn provider_variant_chains_source() {
        let err = SemanticError::Provider {
            batch_index: 1,
            start: 96,
            end: 97,
            source: ProviderError::permanent("HTTP 400"),
        };
        let text = err.to_string();
        assert!(text.contains("batch 1"));
        assert!(text.contains("96..97"));
        assert!(err.source().is_some());
        assert_eq!(err.batch_index(), Some(1));
    }

    #[test]
    fn count_mismatch_display() {
        let err = SemanticError::CountMismatch {
            batch_index: 0,
            expected: 3,
            actual: 2,
        };
        assert!(err.to_string().contains("2 vectors for 3 texts"));
    }

    #[test]
    fn dimension_mismatch_has_no_batch_index() {
        let err = SemanticError::DimensionMismatch {
            item_index: 4,
            expected: 1536,
            actual: 1024,
        };
        assert_eq!(err.batch_index(), None);
        assert!(err.to_string().contains("item 4"));
    }
}
