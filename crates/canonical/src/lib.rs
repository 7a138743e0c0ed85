//! Pricematch description normalizer.
//!
//! Embedding models are sensitive to superficial lexical variance such as
//! casing, stray whitespace and punctuation in unit suffixes. This crate
//! canonicalizes a raw line-item description into a comparison-stable form
//! before it is embedded.
//!
//! ## What we do
//!
//! - Lower-case the whole description
//! - Collapse whitespace runs into single spaces and trim the edges
//! - Apply a data-driven table of domain abbreviations (`"mm."` → `"mm"`,
//!   `"r.c.c."` → `"rcc"`, `"reinforced cement concrete"` → `"rcc"`, ...)
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. `normalize` is total: it
//! never fails, and empty input yields an empty string. It is also
//! idempotent: `normalize(&normalize(s)) == normalize(s)`.
//!
//! ```rust
//! use canonical::normalize;
//!
//! assert_eq!(normalize("  Steel Rebar   12MM. "), "steel rebar 12mm");
//! ```

mod config;
mod error;
mod normalize;
mod table;
mod whitespace;

pub use crate::config::NormalizerConfig;
pub use crate::error::CanonicalError;
pub use crate::normalize::{normalize, Normalizer};
pub use crate::table::{AbbreviationRule, AbbreviationTable};
pub use crate::whitespace::collapse_whitespace;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_steps_in_order() {
        let out = normalize("\tReinforced   Cement\nConcrete  M25 ");
        assert_eq!(out, "rcc m25");
    }

    #[test]
    fn unit_suffix_dots_removed() {
        assert_eq!(normalize("PVC pipe 110MM. dia"), "pvc pipe 110mm dia");
        assert_eq!(normalize("Tile 60CM. x 60CM."), "tile 60cm x 60cm");
    }

    #[test]
    fn rcc_acronym_expanded() {
        assert_eq!(normalize("R.C.C. beam"), "rcc beam");
        assert_eq!(normalize("reinforced cement concrete beam"), "rcc beam");
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn idempotent_over_tricky_inputs() {
        let inputs = [
            "",
            "Steel Rebar 12mm.",
            "12MM..",
            "r.c.c.r.c.c.",
            "reinforced  cement   concrete",
            "  MIXED\u{00A0}whitespace\r\nand CM.  ",
            "İstanbul marble",
            "mm.mm.mm.",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalization not idempotent for {input:?}");
        }
    }

    #[test]
    fn pure_across_calls() {
        let input = "Cement OPC 53 Grade";
        let first = normalize(input);
        for _ in 0..10 {
            assert_eq!(normalize(input), first);
        }
    }

    #[test]
    fn matches_reference_scenario() {
        assert_eq!(normalize("Steel Rebar 12mm."), "steel rebar 12mm");
        assert_eq!(normalize("steel rebar 12mm"), "steel rebar 12mm");
    }

    #[test]
    fn custom_table_extends_defaults() {
        let cfg = NormalizerConfig {
            extra_rules: vec![AbbreviationRule::new("nos.", "nos")],
            ..Default::default()
        };
        let normalizer = Normalizer::new(&cfg).expect("valid config");
        assert_eq!(normalizer.normalize("Door 2 NOS. 12MM."), "door 2 nos 12mm");
    }
}
