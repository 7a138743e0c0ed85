//! Reconciliation writers.
//!
//! A writer receives the ordered [`ReconciledMatch`] sequence of a run and
//! records it wherever its targets live. Scores arrive exact; rounding to
//! three decimals is done here, at presentation time.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::records::{ReconciledMatch, TargetHandle};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for reconciled matches.
pub trait ReconciliationWriter {
    fn write(&mut self, matches: &[ReconciledMatch]) -> Result<(), ReportError>;
}

/// Rounds a similarity score to three decimals for display.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Keeps results in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingWriter {
    matches: Vec<ReconciledMatch>,
}

impl CollectingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[ReconciledMatch] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<ReconciledMatch> {
        self.matches
    }
}

impl ReconciliationWriter for CollectingWriter {
    fn write(&mut self, matches: &[ReconciledMatch]) -> Result<(), ReportError> {
        self.matches.extend_from_slice(matches);
        Ok(())
    }
}

/// One rendered report row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub target: &'a TargetHandle,
    pub inquiry_description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<&'a str>,
    pub rate: f64,
    pub matched_description: &'a str,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ReportAlternative<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAlternative<'a> {
    pub description: &'a str,
    pub rate: f64,
    pub similarity_score: f64,
}

impl<'a> From<&'a ReconciledMatch> for ReportRow<'a> {
    fn from(m: &'a ReconciledMatch) -> Self {
        ReportRow {
            target: &m.target,
            inquiry_description: &m.inquiry_description,
            quantity: m.quantity.as_deref(),
            rate: m.rate,
            matched_description: &m.matched_description,
            similarity_score: round_score(m.score),
            code: m.code.as_deref(),
            unit: m.unit.as_deref(),
            total: m.total,
            alternatives: m
                .alternatives
                .iter()
                .map(|alt| ReportAlternative {
                    description: &alt.description,
                    rate: alt.rate,
                    similarity_score: round_score(alt.score),
                })
                .collect(),
        }
    }
}

/// Renders one JSON row per target to any `io::Write`.
pub struct JsonReportWriter<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReconciliationWriter for JsonReportWriter<W> {
    fn write(&mut self, matches: &[ReconciledMatch]) -> Result<(), ReportError> {
        let rows: Vec<ReportRow<'_>> = matches.iter().map(ReportRow::from).collect();
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &rows)?;
        } else {
            serde_json::to_writer(&mut self.out, &rows)?;
        }
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes the JSON report to a file.
///
/// The report is rendered in memory first and the file is created only when
/// [`ReconciliationWriter::write`] is called, so a run that fails before the
/// write stage leaves any existing file untouched.
pub struct JsonReportFile {
    path: PathBuf,
    pretty: bool,
}

impl JsonReportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReconciliationWriter for JsonReportFile {
    fn write(&mut self, matches: &[ReconciledMatch]) -> Result<(), ReportError> {
        let mut rendered = JsonReportWriter::new(Vec::new()).pretty(self.pretty);
        rendered.write(matches)?;
        fs::write(&self.path, rendered.into_inner())?;
        Ok(())
    }
}
