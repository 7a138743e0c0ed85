//! Records flowing through the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key into the reconciliation writer's destination.
///
/// The core only carries it from inquiry to result; what it names (a
/// spreadsheet cell, a row id, a JSON path) is the writer's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetHandle(String);

impl TargetHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TargetHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TargetHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A pricelist entry with a known rate.
///
/// `normalized_description` is empty until the pipeline fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub description: String,
    #[serde(default)]
    pub normalized_description: String,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ReferenceItem {
    pub fn new(description: impl Into<String>, rate: f64) -> Self {
        Self {
            description: description.into(),
            normalized_description: String::new(),
            rate,
            code: None,
            unit: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// An inquiry line that needs a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryItem {
    pub raw_description: String,
    #[serde(default)]
    pub normalized_description: String,
    pub target: TargetHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl InquiryItem {
    pub fn new(raw_description: impl Into<String>, target: impl Into<TargetHandle>) -> Self {
        Self {
            raw_description: raw_description.into(),
            normalized_description: String::new(),
            target: target.into(),
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }
}

/// A runner-up reference attached when more than one candidate is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub reference_index: usize,
    pub description: String,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub score: f64,
}

/// What the reconciliation writer receives for one inquiry.
///
/// `score` is the exact cosine similarity; rounding is a presentation
/// concern of the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledMatch {
    pub target: TargetHandle,
    pub inquiry_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub reference_index: usize,
    pub matched_description: String,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub score: f64,
    /// `rate × quantity` when the quantity is numeric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
}

/// Line amount for an inquiry priced at `rate`. `None` when there is no
/// quantity or it does not read as a finite number.
pub fn line_total(rate: f64, quantity: Option<&str>) -> Option<f64> {
    let quantity: f64 = quantity?.trim().parse().ok()?;
    let total = rate * quantity;
    total.is_finite().then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_handle_is_transparent() {
        let handle = TargetHandle::new("Sheet1!E12");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"Sheet1!E12\"");
        assert_eq!(handle.to_string(), "Sheet1!E12");
        assert_eq!(TargetHandle::from("a"), TargetHandle::new(String::from("a")));
    }

    #[test]
    fn builders_fill_optional_fields() {
        let item = ReferenceItem::new("Steel Rebar 12mm", 500.0)
            .with_code("ST-12")
            .with_unit("kg");
        assert_eq!(item.code.as_deref(), Some("ST-12"));
        assert_eq!(item.unit.as_deref(), Some("kg"));
        assert!(item.normalized_description.is_empty());

        let inquiry = InquiryItem::new("Steel rebar", "row-3").with_quantity("12");
        assert_eq!(inquiry.target.as_str(), "row-3");
        assert_eq!(inquiry.quantity.as_deref(), Some("12"));
    }

    #[test]
    fn reference_deserializes_without_optional_fields() {
        let item: ReferenceItem =
            serde_json::from_str(r#"{"description": "cement", "rate": 350}"#).unwrap();
        assert_eq!(item.rate, 350.0);
        assert!(item.code.is_none());
    }

    #[test]
    fn line_total_needs_numeric_quantity() {
        assert_eq!(line_total(500.0, Some("40")), Some(20_000.0));
        assert_eq!(line_total(12.5, Some(" 2.5 ")), Some(31.25));
        assert_eq!(line_total(500.0, Some("lump sum")), None);
        assert_eq!(line_total(500.0, Some("")), None);
        assert_eq!(line_total(500.0, None), None);
        assert_eq!(line_total(500.0, Some("inf")), None);
    }
}
