//! # Pricematch Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` takes the two embedded sets produced upstream (pricelist
//! references and inquiry lines) and decides, for every inquiry, which
//! reference it corresponds to.
//!
//! ## Core Types
//!
//! - [`score`]: exact cosine similarity for every `(inquiry, reference)` pair,
//!   returned as a [`ScoreReport`] (matrix plus zero-norm vector indices).
//! - [`SimilarityMatrix`]: dense `(|inquiries|, |references|)` scores.
//! - [`select`]: one [`MatchResult`] per inquiry; lowest index wins ties.
//! - [`rank`]: top-`k` [`MatchCandidate`]s per inquiry.
//! - [`Matcher`]: the two stages behind a validated [`MatcherConfig`].
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Matcher, MatcherConfig};
//!
//! let references = vec![vec![1.0_f64, 0.0], vec![0.0, 1.0]];
//! let inquiries = vec![vec![0.1_f64, 0.9]];
//!
//! let matcher = Matcher::new(MatcherConfig::default()).unwrap();
//! let outcome = matcher.run(&inquiries, &references).unwrap();
//! assert_eq!(outcome.matches[0].reference_index, 1);
//! ```
//!
//! ## Scoring notes
//!
//! A vector with zero (or non-finite) magnitude has no direction. It scores
//! exactly `0.0` against everything and is listed in the report so the
//! caller can warn about it.

mod engine;
mod similarity;
mod types;

pub use engine::{rank, select, MatchOutcome, Matcher};
pub use similarity::{cosine, score, ScoreReport, SimilarityMatrix};
pub use types::{MatchCandidate, MatchError, MatchResult, MatcherConfig, VectorSet};
