use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pricematch::{
    inquiries_from_rows, references_from_rows, round_score, MatcherConfig, RawInquiryRow,
    RawReferenceRow, ReconciledMatch, TracingProgress,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Match request
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Pricelist rows; the same eligibility rules as the CLI loader apply.
    pub references: Vec<RawReferenceRow>,

    /// Inquiry rows to price.
    pub inquiries: Vec<RawInquiryRow>,

    /// Candidates per inquiry, best first. Falls back to the server's
    /// `default_top_k`.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Match response
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub total_inquiries: usize,
    pub results: Vec<InquiryMatches>,
    /// Inquiry positions whose embedding had zero norm.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degenerate_inquiries: Vec<usize>,
}

/// Candidates for one inquiry row
#[derive(Debug, Serialize)]
pub struct InquiryMatches {
    pub target: String,
    pub input_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Selected unit rate times the quantity, when the quantity is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub matches: Vec<MatchHit>,
}

/// Single pricelist candidate
#[derive(Debug, Serialize)]
pub struct MatchHit {
    pub code: Option<String>,
    pub description: String,
    pub unit: Option<String>,
    pub unit_rate: f64,
    /// Cosine similarity rounded to three decimals.
    pub confidence: f64,
}

impl From<ReconciledMatch> for InquiryMatches {
    fn from(m: ReconciledMatch) -> Self {
        let mut matches = Vec::with_capacity(1 + m.alternatives.len());
        matches.push(MatchHit {
            code: m.code,
            description: m.matched_description,
            unit: m.unit,
            unit_rate: m.rate,
            confidence: round_score(m.score),
        });
        matches.extend(m.alternatives.into_iter().map(|alt| MatchHit {
            code: alt.code,
            description: alt.description,
            unit: alt.unit,
            unit_rate: alt.rate,
            confidence: round_score(alt.score),
        }));

        InquiryMatches {
            target: m.target.as_str().to_string(),
            input_description: m.inquiry_description,
            quantity: m.quantity,
            total: m.total,
            matches,
        }
    }
}

/// Prices every inquiry row against the pricelist in the request body.
///
/// Returns one entry per eligible inquiry row, in input order. The first
/// candidate is the selected match; ties go to the earlier pricelist row.
pub async fn match_items(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<MatchRequest>,
) -> ServerResult<impl IntoResponse> {
    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    if top_k == 0 {
        return Err(ServerError::BadRequest("top_k must be >= 1".to_string()));
    }

    let references = references_from_rows(request.references);
    let inquiries = inquiries_from_rows(request.inquiries);

    let pipeline = if state.pipeline.matcher().config().top_k == top_k {
        state.pipeline.as_ref().clone()
    } else {
        state
            .pipeline
            .as_ref()
            .clone()
            .with_matcher(MatcherConfig { top_k })?
    };

    let (matches, summary) = pipeline
        .reconcile(references, inquiries, &TracingProgress)
        .await?;

    tracing::info!(
        references = summary.references,
        inquiries = summary.inquiries,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "match request served"
    );

    Ok(Json(MatchResponse {
        total_inquiries: matches.len(),
        results: matches.into_iter().map(InquiryMatches::from).collect(),
        degenerate_inquiries: summary.degenerate_inquiries,
    }))
}
