//! PDF page-text extraction backend.
//!
//! Loads a document with lopdf and hands back one block of plain text per
//! page. Lines are rebuilt from text positions so that a page drawn in a
//! single text object still comes out one line per baseline.

pub mod reader;
mod text;

pub use reader::PdfReader;
