use std::sync::OnceLock;

use crate::config::NormalizerConfig;
use crate::error::CanonicalError;
use crate::table::AbbreviationTable;
use crate::whitespace::collapse_whitespace;

/// Canonicalizes item descriptions before they are embedded.
///
/// Steps, in order: lower-case, collapse whitespace runs, trim, then apply
/// the abbreviation table. The table is re-applied (collapsing again in
/// between) until the text stops changing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    version: u32,
    table: AbbreviationTable,
}

impl Normalizer {
    /// Builds a normalizer from serializable settings.
    pub fn new(cfg: &NormalizerConfig) -> Result<Self, CanonicalError> {
        if cfg.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }

        let mut table = if cfg.include_builtin_rules {
            AbbreviationTable::builtin()
        } else {
            AbbreviationTable::empty()
        };
        table.extend(cfg.extra_rules.iter().cloned())?;

        Ok(Self {
            version: cfg.version,
            table,
        })
    }

    /// Uses an already validated table.
    pub fn with_table(table: AbbreviationTable) -> Self {
        Self { version: 1, table }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn table(&self) -> &AbbreviationTable {
        &self.table
    }

    /// Normalizes a single description. Total: empty input yields `""`.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(&raw.to_lowercase());
        // Every rule shortens the text, so this loop is bounded by its length.
        while let Some(rewritten) = self.table.apply_once(&text) {
            let collapsed = collapse_whitespace(&rewritten);
            if collapsed == text {
                break;
            }
            text = collapsed;
        }
        text
    }

    /// Same as [`normalize`](Self::normalize) for cells that may be absent.
    pub fn normalize_opt(&self, raw: Option<&str>) -> String {
        raw.map(|text| self.normalize(text)).unwrap_or_default()
    }

    /// Normalizes a batch, preserving order.
    pub fn normalize_all<'a, I>(&self, raws: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        raws.into_iter().map(|raw| self.normalize(raw)).collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_table(AbbreviationTable::builtin())
    }
}

/// Normalizes `raw` with the built-in abbreviation table.
pub fn normalize(raw: &str) -> String {
    static DEFAULT: OnceLock<Normalizer> = OnceLock::new();
    DEFAULT.get_or_init(Normalizer::default).normalize(raw)
}
