//! Error types for the PDF-to-video pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a PDF into slides, narration and video.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the PDF file structure.
    #[error("PDF parsing error: {0}")]
    PdfParseError(String),

    /// The PDF is encrypted and cannot be read.
    #[error("PDF is encrypted: {0}")]
    EncryptedPdf(String),

    /// Section extraction produced nothing usable.
    #[error("No sections extracted from PDF")]
    NoSections,

    /// Failed to write the PPTX package.
    #[error("PPTX writing error: {0}")]
    PptxWriteError(String),

    /// Failed to parse a PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// Failed to draw or save a slide card.
    #[error("Render error: {0}")]
    RenderError(String),

    /// A font could not be loaded.
    #[error("Font error: {0}")]
    FontError(String),

    /// A required external program is not installed.
    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    /// Text-to-speech synthesis failed.
    #[error("Speech synthesis error: {0}")]
    SpeechError(String),

    /// Probing or encoding media failed.
    #[error("Video error: {0}")]
    VideoError(String),

    /// Slide images and narration clips are not positionally aligned.
    #[error("Slide images ({visuals}) and audio clips ({audio}) differ in count")]
    LengthMismatch { visuals: usize, audio: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::NoSections.to_string(), "No sections extracted from PDF");

        let err = Error::LengthMismatch {
            visuals: 3,
            audio: 2,
        };
        assert_eq!(
            err.to_string(),
            "Slide images (3) and audio clips (2) differ in count"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }
}
