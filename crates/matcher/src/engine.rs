use std::cmp::Ordering;

use crate::similarity::{score, ScoreReport, SimilarityMatrix};
use crate::types::{MatchCandidate, MatchError, MatchResult, MatcherConfig};

/// Picks the best reference for every inquiry row, in row order.
///
/// The maximum wins; on equal scores the lowest column index wins. Scores
/// are returned exactly as stored in the matrix.
pub fn select(matrix: &SimilarityMatrix) -> Vec<MatchResult> {
    (0..matrix.rows())
        .filter_map(|row| {
            let mut best: Option<(usize, f64)> = None;
            for (col, &value) in matrix.row(row).iter().enumerate() {
                match best {
                    Some((_, top)) if value <= top => {}
                    _ => best = Some((col, value)),
                }
            }
            best.map(|(reference_index, score)| MatchResult {
                inquiry_index: row,
                reference_index,
                score,
            })
        })
        .collect()
}

/// Top-`k` candidates per inquiry row, ordered by score descending then
/// column index ascending. The first entry of each list equals what
/// [`select`] picks for that row.
pub fn rank(matrix: &SimilarityMatrix, k: usize) -> Vec<Vec<MatchCandidate>> {
    (0..matrix.rows())
        .map(|row| {
            let mut candidates: Vec<MatchCandidate> = matrix
                .row(row)
                .iter()
                .enumerate()
                .map(|(reference_index, &score)| MatchCandidate {
                    reference_index,
                    score,
                })
                .collect();
            candidates.sort_by(by_score_then_index);
            candidates.truncate(k);
            candidates
        })
        .collect()
}

fn by_score_then_index(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.reference_index.cmp(&b.reference_index))
}

/// Everything the matching stage produces for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub report: ScoreReport,
    /// One best match per inquiry, in inquiry order.
    pub matches: Vec<MatchResult>,
    /// Ranked candidates per inquiry; empty when `top_k == 1`.
    pub alternatives: Vec<Vec<MatchCandidate>>,
}

/// Similarity engine plus selector behind one validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    cfg: MatcherConfig,
}

impl Matcher {
    pub fn new(cfg: MatcherConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Scores `inquiries` against `references` and selects the best match
    /// for every inquiry.
    pub fn run<I, R>(&self, inquiries: &[I], references: &[R]) -> Result<MatchOutcome, MatchError>
    where
        I: AsRef<[f64]>,
        R: AsRef<[f64]>,
    {
        let report = score(inquiries, references)?;
        let matches = select(&report.matrix);
        let alternatives = if self.cfg.top_k > 1 {
            rank(&report.matrix, self.cfg.top_k)
        } else {
            Vec::new()
        };
        Ok(MatchOutcome {
            report,
            matches,
            alternatives,
        })
    }
}
