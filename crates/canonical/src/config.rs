//! Configuration for the description normalizer.
//!
//! The `version` field tracks normalization behavior. Any change to the rule
//! set that alters output should come with a version bump so that results
//! produced under different tables can be told apart.
//!
//! ```rust
//! use canonical::{AbbreviationRule, NormalizerConfig};
//!
//! let config = NormalizerConfig {
//!     extra_rules: vec![AbbreviationRule::new("nos.", "nos")],
//!     ..Default::default()
//! };
//! assert!(config.include_builtin_rules);
//! ```

use serde::{Deserialize, Serialize};

use crate::table::AbbreviationRule;

/// Serializable normalizer settings.
///
/// ```json
/// {
///   "version": 1,
///   "include_builtin_rules": true,
///   "extra_rules": [{ "from": "nos.", "to": "nos" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Behavior version; must be >= 1.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Start from the built-in construction-trade rules.
    #[serde(default = "default_true")]
    pub include_builtin_rules: bool,
    /// Rules applied after the built-in ones, in order.
    #[serde(default)]
    pub extra_rules: Vec<AbbreviationRule>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            include_builtin_rules: true,
            extra_rules: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = NormalizerConfig::default();
        assert_eq!(cfg.version, 1);
        assert!(cfg.include_builtin_rules);
        assert!(cfg.extra_rules.is_empty());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: NormalizerConfig = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(cfg, NormalizerConfig::default());
    }

    #[test]
    fn rules_deserialize_in_order() {
        let cfg: NormalizerConfig = serde_json::from_str(
            r#"{"include_builtin_rules": false,
                "extra_rules": [{"from": "nos.", "to": "nos"}, {"from": "kgs", "to": "kg"}]}"#,
        )
        .unwrap();
        assert!(!cfg.include_builtin_rules);
        assert_eq!(cfg.extra_rules[0], AbbreviationRule::new("nos.", "nos"));
        assert_eq!(cfg.extra_rules[1].to, "kg");
    }
}
