//! PDF reader implementation.

use crate::text;
use lopdf::Document;
use slidecast_core::{Error, PageText, Result};
use std::path::Path;

/// Reader producing per-page plain text from a PDF document.
pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| match e {
            lopdf::Error::IO(io) => Error::IoError(io),
            lopdf::Error::Decryption(_) => Error::EncryptedPdf(path.display().to_string()),
            other => Error::PdfParseError(format!("{}: {}", path.display(), other)),
        })?;

        log::debug!("Opened {}", path.display());
        Self::from_document(doc)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::EncryptedPdf("in-memory document".to_string()),
            other => Error::PdfParseError(other.to_string()),
        })?;

        Self::from_document(doc)
    }

    fn from_document(doc: Document) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::EncryptedPdf(
                "password-protected documents are not supported".to_string(),
            ));
        }
        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Extract the text of every page in page order.
    ///
    /// A page whose text layer cannot be decoded yields empty text.
    pub fn pages(&self) -> Vec<PageText> {
        self.doc
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let text = text::page_lines(&self.doc, page_id).unwrap_or_else(|e| {
                    log::warn!("Page {}: text extraction failed ({}), skipping", number, e);
                    String::new()
                });
                PageText::new(number, text)
            })
            .collect()
    }
}
