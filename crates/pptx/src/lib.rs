//! PPTX (Office Open XML) backend for generated slide decks.
//!
//! Writes one slide per [`SlideItem`](slidecast_core::SlideItem) as a ZIP
//! archive of XML parts, and reads decks back for inspection.

pub mod parser;
pub mod templates;
pub mod writer;

pub use parser::{DeckSlide, PptxParser};
pub use writer::{DeckLayout, PptxWriter};
