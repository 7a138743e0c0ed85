//! JSON row loader.
//!
//! Rows arrive as exported from a spreadsheet: descriptions and rates may be
//! missing, blank, numeric or numeric strings. Eligibility rules:
//!
//! - a pricelist row is kept when it has a non-blank description and a
//!   numeric, non-zero rate (a rate like `"call us"` is logged and skipped);
//! - an inquiry row is kept when it has a non-blank description, has no
//!   rate yet, and (if the file has a quantity column at all) a non-blank
//!   quantity.
//!
//! Normalized descriptions are left empty; the pipeline fills them in.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::records::{InquiryItem, ReferenceItem, TargetHandle};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A spreadsheet cell: either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// Numeric reading of the cell, accepting numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(text) => f.write_str(text.trim()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReferenceRow {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rate: Option<CellValue>,
    #[serde(default)]
    pub code: Option<CellValue>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInquiryRow {
    /// Writer key; defaults to `row-<n>` (1-based) when absent.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Outer `None`: the row has no quantity column. Inner `None`: the
    /// column exists but the cell is empty.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Option<CellValue>>,
    #[serde(default)]
    pub rate: Option<CellValue>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Applies the pricelist eligibility rules, preserving row order.
pub fn references_from_rows(rows: Vec<RawReferenceRow>) -> Vec<ReferenceItem> {
    let total = rows.len();
    let mut items = Vec::with_capacity(total);

    for (idx, row) in rows.into_iter().enumerate() {
        let Some(description) = non_blank(row.description.as_deref()) else {
            continue;
        };
        let Some(rate_cell) = row.rate.as_ref().filter(|cell| !cell.is_blank()) else {
            continue;
        };
        let Some(rate) = rate_cell.as_f64().filter(|r| r.is_finite()) else {
            warn!(row = idx + 1, value = %rate_cell, "skipping pricelist row with non-numeric rate");
            continue;
        };
        if rate == 0.0 {
            continue;
        }

        let mut item = ReferenceItem::new(description, rate);
        item.code = row.code.filter(|c| !c.is_blank()).map(|c| c.to_string());
        item.unit = row.unit.filter(|u| !u.trim().is_empty());
        items.push(item);
    }

    debug!(kept = items.len(), total, "pricelist rows loaded");
    items
}

/// Applies the inquiry eligibility rules, preserving row order.
pub fn inquiries_from_rows(rows: Vec<RawInquiryRow>) -> Vec<InquiryItem> {
    let total = rows.len();
    let has_quantity_column = rows.iter().any(|row| row.quantity.is_some());
    let mut items = Vec::with_capacity(total);

    for (idx, row) in rows.into_iter().enumerate() {
        let Some(description) = non_blank(row.description.as_deref()) else {
            continue;
        };
        let quantity = row.quantity.flatten().filter(|q| !q.is_blank());
        if has_quantity_column && quantity.is_none() {
            continue;
        }
        if row.rate.as_ref().is_some_and(|rate| !rate.is_blank()) {
            continue;
        }

        let target = row
            .target
            .map(TargetHandle::from)
            .unwrap_or_else(|| TargetHandle::new(format!("row-{}", idx + 1)));
        let mut item = InquiryItem::new(description, target);
        item.quantity = quantity.map(|q| q.to_string());
        items.push(item);
    }

    debug!(kept = items.len(), total, "inquiry rows loaded");
    items
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a pricelist from a JSON array of [`RawReferenceRow`]s.
pub fn load_references<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceItem>, LoadError> {
    Ok(references_from_rows(read_rows(path.as_ref())?))
}

/// Loads inquiry lines from a JSON array of [`RawInquiryRow`]s.
pub fn load_inquiries<P: AsRef<Path>>(path: P) -> Result<Vec<InquiryItem>, LoadError> {
    Ok(inquiries_from_rows(read_rows(path.as_ref())?))
}
