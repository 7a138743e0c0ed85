use std::time::{Duration, Instant};

use canonical::Normalizer;
use matcher::{MatchCandidate, MatchOutcome, Matcher, MatcherConfig, VectorSet};
use semantic::{BatchProgress, EmbeddingClient, EmbeddingRole, EmbeddingVector};
use tracing::{info, warn};

use crate::config::PricematchConfig;
use crate::progress::{ProgressEvent, ProgressSink, Stage};
use crate::reconcile::ReconciliationWriter;
use crate::records::{line_total, Alternative, InquiryItem, ReconciledMatch, ReferenceItem};
use crate::PipelineError;

/// Counters for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub references: usize,
    pub inquiries: usize,
    pub matched: usize,
    pub degenerate_inquiries: Vec<usize>,
    pub degenerate_references: Vec<usize>,
    pub elapsed: Duration,
}

/// Normalize → embed → score → select → reconcile.
///
/// Built once with its collaborators and reused across runs. The embedding
/// client is injected, so tests and dry runs can swap in offline providers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    embedder: EmbeddingClient,
    matcher: Matcher,
    concurrent_roles: bool,
}

impl Pipeline {
    pub fn new(normalizer: Normalizer, embedder: EmbeddingClient, matcher: Matcher) -> Self {
        Self {
            normalizer,
            embedder,
            matcher,
            concurrent_roles: false,
        }
    }

    /// Builds every stage from a validated configuration.
    pub fn from_config(cfg: &PricematchConfig) -> Result<Self, PipelineError> {
        let normalizer = Normalizer::new(&cfg.normalizer)?;
        let embedder = EmbeddingClient::from_config(&cfg.embedding)?;
        let matcher = Matcher::new(cfg.matcher.clone())?;
        Ok(Self::new(normalizer, embedder, matcher)
            .with_concurrent_roles(cfg.pipeline.concurrent_roles))
    }

    /// Embed both sets at the same time. Output is identical to the
    /// sequential path.
    pub fn with_concurrent_roles(mut self, enabled: bool) -> Self {
        self.concurrent_roles = enabled;
        self
    }

    /// Replaces the matcher, e.g. to honor a per-request `top_k`.
    pub fn with_matcher(mut self, cfg: MatcherConfig) -> Result<Self, PipelineError> {
        self.matcher = Matcher::new(cfg)?;
        Ok(self)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn embedder(&self) -> &EmbeddingClient {
        &self.embedder
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Runs the full pipeline and hands the results to `writer` in inquiry
    /// order.
    pub async fn run(
        &self,
        references: Vec<ReferenceItem>,
        inquiries: Vec<InquiryItem>,
        writer: &mut dyn ReconciliationWriter,
        progress: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let (matches, mut summary) = self.reconcile(references, inquiries, progress).await?;

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::Write,
        });
        writer.write(&matches)?;
        progress.report(&ProgressEvent::finished(Stage::Write, stage_start.elapsed()));

        summary.elapsed = started.elapsed();
        info!(
            matched = summary.matched,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "reconciliation complete"
        );
        Ok(summary)
    }

    /// Everything but the writer: returns the reconciled matches directly.
    pub async fn reconcile(
        &self,
        mut references: Vec<ReferenceItem>,
        mut inquiries: Vec<InquiryItem>,
        progress: &dyn ProgressSink,
    ) -> Result<(Vec<ReconciledMatch>, RunSummary), PipelineError> {
        let started = Instant::now();
        if references.is_empty() {
            return Err(PipelineError::EmptyReferences);
        }
        if inquiries.is_empty() {
            return Err(PipelineError::EmptyInquiries);
        }

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::Normalize,
        });
        for item in &mut references {
            item.normalized_description = self.normalizer.normalize(&item.description);
        }
        for item in &mut inquiries {
            item.normalized_description = self.normalizer.normalize(&item.raw_description);
        }
        progress.report(&ProgressEvent::finished(Stage::Normalize, stage_start.elapsed()));

        let reference_texts: Vec<String> = references
            .iter()
            .map(|r| r.normalized_description.clone())
            .collect();
        let inquiry_texts: Vec<String> = inquiries
            .iter()
            .map(|q| q.normalized_description.clone())
            .collect();

        let (reference_vectors, inquiry_vectors) = self
            .embed_both(&reference_texts, &inquiry_texts, progress)
            .await?;

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::Score,
        });
        let outcome = self.matcher.run(&inquiry_vectors, &reference_vectors)?;
        progress.report(&ProgressEvent::finished(Stage::Score, stage_start.elapsed()));
        report_degenerate(&outcome, progress);

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::Select,
        });
        let matches = assemble(&references, &inquiries, &outcome);
        progress.report(&ProgressEvent::finished(Stage::Select, stage_start.elapsed()));

        let summary = RunSummary {
            references: references.len(),
            inquiries: inquiries.len(),
            matched: matches.len(),
            degenerate_inquiries: outcome.report.degenerate_inquiries.clone(),
            degenerate_references: outcome.report.degenerate_references.clone(),
            elapsed: started.elapsed(),
        };
        Ok((matches, summary))
    }

    async fn embed_both(
        &self,
        reference_texts: &[String],
        inquiry_texts: &[String],
        progress: &dyn ProgressSink,
    ) -> Result<(Vec<EmbeddingVector>, Vec<EmbeddingVector>), PipelineError> {
        let observer = |batch: BatchProgress| progress.report(&ProgressEvent::Batch(batch));

        if self.concurrent_roles {
            let stage_start = Instant::now();
            progress.report(&ProgressEvent::StageStarted {
                stage: Stage::EmbedReferences,
            });
            progress.report(&ProgressEvent::StageStarted {
                stage: Stage::EmbedInquiries,
            });
            let (references, inquiries) = tokio::try_join!(
                self.embedder.embed_with_progress(
                    reference_texts,
                    EmbeddingRole::Document,
                    Some(&observer)
                ),
                self.embedder
                    .embed_with_progress(inquiry_texts, EmbeddingRole::Query, Some(&observer)),
            )?;
            let elapsed = stage_start.elapsed();
            progress.report(&ProgressEvent::finished(Stage::EmbedReferences, elapsed));
            progress.report(&ProgressEvent::finished(Stage::EmbedInquiries, elapsed));
            return Ok((references, inquiries));
        }

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::EmbedReferences,
        });
        let references = self
            .embedder
            .embed_with_progress(reference_texts, EmbeddingRole::Document, Some(&observer))
            .await?;
        progress.report(&ProgressEvent::finished(
            Stage::EmbedReferences,
            stage_start.elapsed(),
        ));

        let stage_start = Instant::now();
        progress.report(&ProgressEvent::StageStarted {
            stage: Stage::EmbedInquiries,
        });
        let inquiries = self
            .embedder
            .embed_with_progress(inquiry_texts, EmbeddingRole::Query, Some(&observer))
            .await?;
        progress.report(&ProgressEvent::finished(
            Stage::EmbedInquiries,
            stage_start.elapsed(),
        ));

        Ok((references, inquiries))
    }
}

fn report_degenerate(outcome: &MatchOutcome, progress: &dyn ProgressSink) {
    let report = &outcome.report;
    for &index in &report.degenerate_references {
        warn!(index, "pricelist embedding has zero norm");
        progress.report(&ProgressEvent::DegenerateVector {
            set: VectorSet::Reference,
            index,
        });
    }
    for &index in &report.degenerate_inquiries {
        warn!(index, "inquiry embedding has zero norm");
        progress.report(&ProgressEvent::DegenerateVector {
            set: VectorSet::Inquiry,
            index,
        });
    }
}

fn assemble(
    references: &[ReferenceItem],
    inquiries: &[InquiryItem],
    outcome: &MatchOutcome,
) -> Vec<ReconciledMatch> {
    outcome
        .matches
        .iter()
        .filter_map(|result| {
            let inquiry = inquiries.get(result.inquiry_index)?;
            let reference = references.get(result.reference_index)?;
            let alternatives = outcome
                .alternatives
                .get(result.inquiry_index)
                .map(|ranked| alternatives_for(references, ranked))
                .unwrap_or_default();

            Some(ReconciledMatch {
                target: inquiry.target.clone(),
                inquiry_description: inquiry.raw_description.clone(),
                quantity: inquiry.quantity.clone(),
                reference_index: result.reference_index,
                matched_description: reference.normalized_description.clone(),
                rate: reference.rate,
                code: reference.code.clone(),
                unit: reference.unit.clone(),
                score: result.score,
                total: line_total(reference.rate, inquiry.quantity.as_deref()),
                alternatives,
            })
        })
        .collect()
}

/// Ranked runners-up; the head of `ranked` is the selected match itself and
/// is skipped.
fn alternatives_for(references: &[ReferenceItem], ranked: &[MatchCandidate]) -> Vec<Alternative> {
    ranked
        .iter()
        .skip(1)
        .filter_map(|candidate| {
            let reference = references.get(candidate.reference_index)?;
            Some(Alternative {
                reference_index: candidate.reference_index,
                description: reference.normalized_description.clone(),
                rate: reference.rate,
                code: reference.code.clone(),
                unit: reference.unit.clone(),
                score: candidate.score,
            })
        })
        .collect()
}
