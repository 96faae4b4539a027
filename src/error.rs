//! Error types for pdf2office.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf2office operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while writing output buffers or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file could not be read.
    #[error("Cannot read {}: {}", .path.display(), .source)]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Page range string that could not be parsed.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Table extraction found nothing to convert.
    #[error("No tables found in the PDF")]
    EmptyResult,

    /// Error encoding the spreadsheet.
    #[error("Spreadsheet encoding error: {0}")]
    Spreadsheet(String),

    /// Error encoding the word-processor document.
    #[error("Word document encoding error: {0}")]
    WordDocument(String),

    /// Error writing the zip archive.
    #[error("Archive error: {0}")]
    Archive(String),
}

/// Coarse classification of an [`Error`], as surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upload is not a parseable PDF, or the input file cannot be read.
    MalformedInput,
    /// Table extraction produced nothing; a warning rather than a failure.
    EmptyResult,
    /// Encoding or writing the output failed. Plain [`Error::Io`] lands
    /// here; input reads use [`Error::ReadInput`].
    BuildFailure,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownFormat
            | Error::UnsupportedVersion(_)
            | Error::PdfParse(_)
            | Error::Encrypted
            | Error::PageOutOfRange(..)
            | Error::InvalidPageRange(_)
            | Error::ReadInput { .. } => ErrorKind::MalformedInput,
            Error::EmptyResult => ErrorKind::EmptyResult,
            Error::Io(_) | Error::Spreadsheet(_) | Error::WordDocument(_) | Error::Archive(_) => {
                ErrorKind::BuildFailure
            }
        }
    }

    /// Whether this error should be shown as a warning instead of a failure.
    pub fn is_warning(&self) -> bool {
        self.kind() == ErrorKind::EmptyResult
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::PdfParse(e.to_string()),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyResult;
        assert_eq!(err.to_string(), "No tables found in the PDF");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_read_input_is_malformed_input() {
        let err = Error::ReadInput {
            path: PathBuf::from("missing.pdf"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "Cannot read missing.pdf: no such file");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::UnknownFormat.kind(), ErrorKind::MalformedInput);
        assert_eq!(Error::Encrypted.kind(), ErrorKind::MalformedInput);
        assert_eq!(Error::EmptyResult.kind(), ErrorKind::EmptyResult);
        assert_eq!(
            Error::Archive("disk full".into()).kind(),
            ErrorKind::BuildFailure
        );
        assert!(Error::EmptyResult.is_warning());
        assert!(!Error::Spreadsheet("bad".into()).is_warning());
    }
}
