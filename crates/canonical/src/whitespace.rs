//! Whitespace normalization utilities.
//!
//! Whitespace follows Unicode's definition, so tabs, newlines, carriage
//! returns and non-breaking spaces all count as separators.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  steel\t\trebar \n 12mm "), "steel rebar 12mm");
//! ```

/// Collapses repeated whitespace into single ASCII spaces and trims both ends.
///
/// Returns an empty string for empty or whitespace-only input.
///
/// # Examples
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("cement   opc"), "cement opc");
/// assert_eq!(collapse_whitespace("cement\r\nopc"), "cement opc");
/// assert_eq!(collapse_whitespace("cement\u{00A0}opc"), "cement opc");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Returns true when `text` is already in the form [`collapse_whitespace`] produces.
pub(crate) fn is_collapsed(text: &str) -> bool {
    let mut previous_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if previous_space || ch != ' ' {
                return false;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
    }
    text.is_empty() || !previous_space
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("a \t b\n\nc"), "a b c");
    }

    #[test]
    fn collapsed_detection() {
        assert!(is_collapsed(""));
        assert!(is_collapsed("steel rebar"));
        assert!(!is_collapsed(" steel"));
        assert!(!is_collapsed("steel "));
        assert!(!is_collapsed("steel  rebar"));
        assert!(!is_collapsed("steel\trebar"));
    }
}
