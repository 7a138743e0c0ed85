use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two embedded sets a vector belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorSet {
    Inquiry,
    Reference,
}

impl std::fmt::Display for VectorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorSet::Inquiry => f.write_str("inquiry"),
            VectorSet::Reference => f.write_str("reference"),
        }
    }
}

/// Configuration for the matching stage.
///
/// `MatcherConfig` is cheap to clone and serde-friendly so it can be embedded
/// in the pipeline's YAML config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    /// Number of ranked candidates kept per inquiry. `1` keeps only the best
    /// match; larger values attach alternatives.
    #[serde(default = "MatcherConfig::default_top_k")]
    pub top_k: usize,
}

impl MatcherConfig {
    pub(crate) fn default_top_k() -> usize {
        1
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.top_k == 0 {
            return Err(MatchError::InvalidConfig(
                "top_k must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: Self::default_top_k(),
        }
    }
}

/// Best reference for one inquiry.
///
/// `score` is the exact cosine similarity; presentation rounding happens
/// downstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub inquiry_index: usize,
    pub reference_index: usize,
    pub score: f64,
}

/// One entry of a ranked candidate list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchCandidate {
    pub reference_index: usize,
    pub score: f64,
}

/// Errors produced by the matching layer. All of them are validation
/// failures: nothing here is worth retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("no {0} vectors to score")]
    EmptySet(VectorSet),
    #[error("{set} vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        set: VectorSet,
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("similarity matrix rows must all have {expected} columns, row {row} has {actual}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
