use serde::{Deserialize, Serialize};

/// A dense embedding as returned by a provider.
pub type EmbeddingVector = Vec<f64>;

/// Which side of a retrieval task a text belongs to.
///
/// Asymmetric embedding models encode searchable documents and search queries
/// differently, so pricelist entries go in as [`Document`](Self::Document)
/// and inquiry lines as [`Query`](Self::Query).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbeddingRole {
    #[serde(rename = "search_document")]
    Document,
    #[serde(rename = "search_query")]
    Query,
}

impl EmbeddingRole {
    /// Wire name understood by the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            EmbeddingRole::Document => "search_document",
            EmbeddingRole::Query => "search_query",
        }
    }
}

impl std::fmt::Display for EmbeddingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One batch handed to an [`EmbeddingProvider`](crate::EmbeddingProvider).
#[derive(Debug, Clone, Copy)]
pub struct EmbedRequest<'a> {
    /// Texts of this batch, in input order.
    pub texts: &'a [String],
    pub role: EmbeddingRole,
    /// Dimension the caller expects back.
    pub dimension: usize,
    /// Position of this batch within the current `embed` call.
    pub batch_index: usize,
}

/// Whether a batch is about to be sent or has come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    Started,
    Finished,
}

/// Progress notification emitted by [`EmbeddingClient`](crate::EmbeddingClient)
/// around every provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub role: EmbeddingRole,
    pub stage: BatchStage,
    pub batch_index: usize,
    pub batch_count: usize,
    /// Half-open item range `[start, end)` covered by the batch.
    pub start: usize,
    pub end: usize,
}
