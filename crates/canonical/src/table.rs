//! Domain abbreviation table.
//!
//! Rules are plain data: an ordered list of `from -> to` substring
//! replacements applied after lower-casing and whitespace collapsing. Adding
//! a rule never requires touching the normalization algorithm.
//!
//! Every rule must shorten the text it rewrites. That constraint is what lets
//! [`Normalizer`](crate::Normalizer) re-apply the table until nothing changes
//! and still terminate, which in turn makes normalization idempotent.

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;
use crate::whitespace::is_collapsed;

/// A single substring replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbbreviationRule {
    pub from: String,
    pub to: String,
}

impl AbbreviationRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn validate(&self) -> Result<(), CanonicalError> {
        let reject = |reason| {
            Err(CanonicalError::InvalidRule {
                from: self.from.clone(),
                to: self.to.clone(),
                reason,
            })
        };

        if self.from.is_empty() {
            return reject("pattern must not be empty");
        }
        // Patterns are matched against lower-cased, collapsed text, so anything
        // else could never fire.
        if self.from != self.from.to_lowercase() || !is_collapsed(&self.from) {
            return reject("pattern must be lower-case with single inner spaces");
        }
        if self.to != self.to.to_lowercase() || !is_collapsed(&self.to) {
            return reject("replacement must be lower-case with single inner spaces");
        }
        if self.to.len() >= self.from.len() {
            return reject("replacement must be shorter than the pattern");
        }
        Ok(())
    }
}

/// Ordered, validated set of [`AbbreviationRule`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationTable {
    rules: Vec<AbbreviationRule>,
}

impl AbbreviationTable {
    /// Builds a table from arbitrary rules, rejecting any that break the
    /// shortening constraint.
    pub fn new(rules: Vec<AbbreviationRule>) -> Result<Self, CanonicalError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    /// Table with no rules; normalization then only lower-cases and collapses.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in construction-trade rules: unit-suffix dot removal and the
    /// reinforced cement concrete acronym.
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Appends more rules after the existing ones.
    pub fn extend(
        &mut self,
        rules: impl IntoIterator<Item = AbbreviationRule>,
    ) -> Result<(), CanonicalError> {
        for rule in rules {
            rule.validate()?;
            self.rules.push(rule);
        }
        Ok(())
    }

    pub fn rules(&self) -> &[AbbreviationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule once, in order. Returns `None` when nothing matched.
    pub(crate) fn apply_once(&self, text: &str) -> Option<String> {
        let mut current: Option<String> = None;
        for rule in &self.rules {
            let source = current.as_deref().unwrap_or(text);
            if source.contains(rule.from.as_str()) {
                current = Some(source.replace(rule.from.as_str(), &rule.to));
            }
        }
        current
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> Vec<AbbreviationRule> {
    vec![
        AbbreviationRule::new("mm.", "mm"),
        AbbreviationRule::new("cm.", "cm"),
        AbbreviationRule::new("r.c.c.", "rcc"),
        AbbreviationRule::new("reinforced cement concrete", "rcc"),
    ]
}
