//! Workspace umbrella crate for pricematch.
//!
//! Given a pricelist (descriptions with known rates) and an inquiry list
//! (descriptions needing a rate), this crate assigns each inquiry the rate of
//! its most semantically similar pricelist entry and hands the result to a
//! reconciliation writer.
//!
//! Stages, leaf first:
//!
//! - [`canonical`]: description normalizer
//! - [`semantic`]: batched, role-aware embedding client
//! - [`matcher`]: cosine similarity matrix and best-match selection
//! - [`Pipeline`]: orchestration, plus the JSON [`loader`] and the
//!   [`ReconciliationWriter`] implementations
//!
//! ```no_run
//! use pricematch::{
//!     load_inquiries, load_references, JsonReportWriter, Pipeline, PricematchConfig,
//!     TracingProgress,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cfg = PricematchConfig::from_file("pricematch.yaml")?;
//! cfg.apply_env();
//! let pipeline = Pipeline::from_config(&cfg)?;
//!
//! let mut writer = JsonReportWriter::new(std::io::stdout());
//! pipeline
//!     .run(
//!         load_references("pricelist.json")?,
//!         load_inquiries("inquiry.json")?,
//!         &mut writer,
//!         &TracingProgress,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod loader;
mod pipeline;
mod progress;
mod reconcile;
mod records;

pub use canonical::{normalize, AbbreviationRule, AbbreviationTable, CanonicalError, Normalizer};
pub use matcher::{MatchError, MatchResult, Matcher, MatcherConfig};
pub use semantic::{EmbeddingClient, EmbeddingConfig, EmbeddingRole, ProviderError, SemanticError};

pub use crate::config::{ConfigLoadError, PricematchConfig};
pub use crate::loader::{
    inquiries_from_rows, load_inquiries, load_references, references_from_rows, LoadError,
    RawInquiryRow, RawReferenceRow,
};
pub use crate::pipeline::{Pipeline, RunSummary};
pub use crate::progress::{
    CollectingProgress, NoProgress, ProgressEvent, ProgressSink, Stage, TracingProgress,
};
pub use crate::reconcile::{
    round_score, CollectingWriter, JsonReportFile, JsonReportWriter, ReconciliationWriter,
    ReportError,
};
pub use crate::records::{
    line_total, Alternative, InquiryItem, ReconciledMatch, ReferenceItem, TargetHandle,
};

use std::error::Error;
use std::fmt;

/// Errors that can occur while running the matching pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// The pricelist had no eligible rows.
    EmptyReferences,
    /// The inquiry list had no eligible rows.
    EmptyInquiries,
    Normalizer(CanonicalError),
    Embedding(SemanticError),
    Match(MatchError),
    Report(ReportError),
}

impl PipelineError {
    /// Validation failures are caused by the input or configuration and
    /// will fail again on retry.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyReferences
                | PipelineError::EmptyInquiries
                | PipelineError::Normalizer(_)
                | PipelineError::Match(_)
        )
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EmptyReferences => write!(f, "pricelist contains no eligible items"),
            PipelineError::EmptyInquiries => write!(f, "inquiry contains no items to price"),
            PipelineError::Normalizer(err) => write!(f, "normalizer setup failed: {err}"),
            PipelineError::Embedding(err) => write!(f, "embedding failed: {err}"),
            PipelineError::Match(err) => write!(f, "matching failed: {err}"),
            PipelineError::Report(err) => write!(f, "reconciliation writer failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Normalizer(err) => Some(err),
            PipelineError::Embedding(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::Report(err) => Some(err),
            PipelineError::EmptyReferences | PipelineError::EmptyInquiries => None,
        }
    }
}

impl From<CanonicalError> for PipelineError {
    fn from(value: CanonicalError) -> Self {
        PipelineError::Normalizer(value)
    }
}

impl From<SemanticError> for PipelineError {
    fn from(value: SemanticError) -> Self {
        PipelineError::Embedding(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<ReportError> for PipelineError {
    fn from(value: ReportError) -> Self {
        PipelineError::Report(value)
    }
}
