//! Normalization of extracted PDF page text.
//!
//! Folds compatibility characters (ligatures, full-width forms) with NFKC,
//! unifies line endings and collapses whitespace runs while keeping line
//! breaks, since heading detection works line by line.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

/// Soft hyphens and zero-width characters that PDF text layers leave behind.
const INVISIBLE_CHARS: &[char] = &['\u{00AD}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Text normalizer for extracted page text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to apply Unicode NFKC folding.
    fold_compatibility: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self {
            fold_compatibility: true,
        }
    }

    /// Set whether to apply NFKC compatibility folding.
    pub fn with_fold_compatibility(mut self, fold: bool) -> Self {
        self.fold_compatibility = fold;
        self
    }

    /// Normalize a single line of text.
    ///
    /// - Folds ligatures such as "ﬁ" into "fi"
    /// - Drops soft hyphens and zero-width characters
    /// - Collapses whitespace runs to single spaces
    /// - Trims leading/trailing whitespace
    pub fn normalize_line(&self, text: &str) -> String {
        let folded: String = if self.fold_compatibility {
            text.nfkc().collect()
        } else {
            text.to_string()
        };

        let visible: String = folded
            .chars()
            .filter(|c| !INVISIBLE_CHARS.contains(c))
            .collect();

        WHITESPACE_COLLAPSE_REGEX
            .replace_all(&visible, " ")
            .trim()
            .to_string()
    }

    /// Normalize a page of text, returning its non-empty lines in order.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .lines()
            .map(|l| self.normalize_line(l))
            .filter(|l| !l.is_empty())
            .collect()
    }
}
