use thiserror::Error;

/// Errors raised while building a normalizer. Normalizing text itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid abbreviation rule `{from}` -> `{to}`: {reason}")]
    InvalidRule {
        from: String,
        to: String,
        reason: &'static str,
    },
}
