//! Core domain types, section extraction, and extractive summarization
//! for turning a PDF into a narrated slide deck.

pub mod error;
pub mod normalize;
pub mod sections;
pub mod summarize;
pub mod types;

pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use sections::{is_heading_line, SectionExtractor, DEFAULT_SECTION_TITLE};
pub use summarize::{split_sentences, tokenize_words, Summarizer};
pub use types::{PageText, Section, SlideItem};
