//! Error types for pdftables.

use std::io;
use thiserror::Error;

/// Result type alias for pdftables operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting tables.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when opening the source document or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Not a PDF file (missing %PDF- header)")]
    UnknownFormat,

    /// The header carries a version string we cannot read.
    #[error("Unreadable PDF version in header: {0}")]
    UnsupportedVersion(String),

    /// Error reported by the PDF object layer.
    #[error("Malformed PDF: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Encrypted PDFs are not supported")]
    Encrypted,

    /// Requested page number past the end of the document.
    #[error("Page {0} does not exist (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Page range string that could not be parsed.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Row tolerance must be a finite, non-negative fraction.
    #[error("Invalid row tolerance: {0}")]
    InvalidTolerance(f32),

    /// Error writing delimited output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during rendering (JSON, text).
    #[error("Failed to render tables: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::PageOutOfRange(4, 2).to_string(),
            "Page 4 does not exist (document has 2 pages)"
        );
        assert_eq!(
            Error::InvalidTolerance(-0.5).to_string(),
            "Invalid row tolerance: -0.5"
        );
    }

    #[test]
    fn test_lopdf_errors_are_mapped() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(Error::from(lopdf::Error::IO(missing)), Error::Io(_)));
        assert!(matches!(
            Error::from(lopdf::Error::ObjectNotFound((7, 0))),
            Error::PdfParse(_)
        ));
    }
}
