//! Section extraction from page text.
//!
//! A line of at most six words is a heading when it has a numeric prefix
//! ("1. "), is entirely uppercase, or has at least half of its words
//! capitalized. Every heading opens a new section; other lines accumulate
//! into the current one.

use crate::{Error, PageText, Result, Section, TextNormalizer};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for a numbered heading prefix such as "1. " or "12. ".
static NUMERIC_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());

/// Headings are never longer than this many words.
const MAX_HEADING_WORDS: usize = 6;

/// Title of the section that collects body text before the first heading.
pub const DEFAULT_SECTION_TITLE: &str = "Introduction";

/// Classify a line as a heading.
pub fn is_heading_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > MAX_HEADING_WORDS {
        return false;
    }

    if NUMERIC_PREFIX_REGEX.is_match(line) {
        return true;
    }

    if line.to_uppercase() == line && line.chars().any(char::is_alphabetic) {
        return true;
    }

    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized >= (words.len() / 2).max(1)
}

/// Splits page text into titled sections.
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    normalizer: TextNormalizer,
}

impl SectionExtractor {
    /// Create an extractor with the default normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom normalizer for page text.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Extract sections from pages in document order.
    ///
    /// Sections without body text are dropped. Fails with
    /// [`Error::NoSections`] when nothing remains.
    pub fn extract(&self, pages: &[PageText]) -> Result<Vec<Section>> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for page in pages {
            for line in self.normalizer.normalize_to_lines(&page.text) {
                if is_heading_line(&line) {
                    if let Some(done) = current.take().filter(Section::has_text) {
                        sections.push(done);
                    }
                    current = Some(Section::new(line, page.number));
                } else {
                    current
                        .get_or_insert_with(|| Section::new(DEFAULT_SECTION_TITLE, page.number))
                        .push_line(&line);
                }
            }
        }

        if let Some(done) = current.filter(Section::has_text) {
            sections.push(done);
        }

        log::debug!(
            "Extracted {} sections from {} pages",
            sections.len(),
            pages.len()
        );

        if sections.is_empty() {
            return Err(Error::NoSections);
        }

        Ok(sections)
    }
}
