//! Domain types flowing through the pipeline.
//!
//! Every value here is created once by one stage and consumed by the next.
//! Lists of these are positionally aligned: index `i` of the slide items,
//! visuals and narration clips all describe the same slide.

use serde::{Deserialize, Serialize};

/// Plain text of a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number.
    pub number: u32,

    /// Extracted text, one visual line per text line.
    pub text: String,
}

impl PageText {
    /// Create page text for the given page number.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// A titled span of document text bounded by heading lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading line that opened the section.
    pub title: String,

    /// Body lines joined with single leading spaces.
    pub text: String,

    /// 1-based page the section starts on.
    pub page: u32,
}

impl Section {
    /// Create an empty section starting on `page`.
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            text: String::new(),
            page,
        }
    }

    /// Append a body line.
    pub fn push_line(&mut self, line: &str) {
        self.text.push(' ');
        self.text.push_str(line);
    }

    /// Whether the section has any body text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Headline, bullets and speaker note derived from a section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideItem {
    /// Slide title.
    pub headline: String,

    /// At most two short bullet lines.
    pub bullets: Vec<String>,

    /// Speaker note, also used as the narration script.
    pub note: String,
}

impl SlideItem {
    /// Text to narrate for this slide: the note, or the headline when the note is empty.
    pub fn narration(&self) -> &str {
        if self.note.trim().is_empty() {
            &self.headline
        } else {
            &self.note
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_push_line() {
        let mut section = Section::new("Intro", 1);
        assert!(!section.has_text());

        section.push_line("first line");
        section.push_line("second line");
        assert_eq!(section.text, " first line second line");
        assert!(section.has_text());
    }

    #[test]
    fn test_narration_falls_back_to_headline() {
        let item = SlideItem {
            headline: "Results".to_string(),
            bullets: vec![],
            note: "  ".to_string(),
        };
        assert_eq!(item.narration(), "Results");

        let item = SlideItem {
            note: "We measured twice.".to_string(),
            ..item
        };
        assert_eq!(item.narration(), "We measured twice.");
    }
}
