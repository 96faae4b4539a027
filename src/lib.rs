//! # pdf2office
//!
//! Convert the content of a PDF into an Excel workbook or a Word document,
//! optionally packaged as a zip archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2office::{convert_file, ConvertOptions, OutputFormat};
//!
//! fn main() -> pdf2office::Result<()> {
//!     // Detected tables become sheets Table_1, Table_2, ...
//!     let download = convert_file("report.pdf", &ConvertOptions::default())?;
//!     std::fs::write(&download.filename, &download.bytes)?;
//!
//!     // Text lines as paragraphs, zipped
//!     let options = ConvertOptions::new()
//!         .with_format(OutputFormat::Word)
//!         .with_compress(true);
//!     let download = convert_file("report.pdf", &options)?;
//!     assert_eq!(download.filename, "converted.zip");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`parser`]: text lines and tables out of a PDF (lopdf)
//! - [`build`]: `.xlsx` (rust_xlsxwriter) and `.docx` (docx-rs) encoding
//! - [`archive`]: single-entry zip packaging
//! - [`convert`]: the request-scoped pipeline
//! - [`session`]: the upload / options / trigger / download state machine

pub mod archive;
pub mod build;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use archive::{Archiver, ZipArchiver, ARCHIVE_FILENAME};
pub use build::{DocumentBuilder, OfficeBuilder};
pub use convert::{ConvertOptions, Download, ExcelSource, OutputFormat, Pipeline};
pub use detect::{looks_like_pdf, read_header, PdfHeader};
pub use error::{Error, ErrorKind, Result};
pub use model::{Archive, Cell, DocumentKind, OutputDocument, Table, TableRow, TextLines};
pub use parser::{ErrorMode, ExtractOptions, Extractor, PageSelection, PdfExtractor};
pub use session::{Session, SessionState, StatusLevel, StatusMessage};

use std::path::Path;

/// Convert PDF bytes in one call.
///
/// Uses the default pipeline configured from `options`. Table mode with no
/// tables found returns [`Error::EmptyResult`].
///
/// # Example
///
/// ```no_run
/// use pdf2office::{convert_bytes, ConvertOptions, ExcelSource};
///
/// let data = std::fs::read("statement.pdf").unwrap();
/// let options = ConvertOptions::new().with_excel_source(ExcelSource::Text);
/// let download = convert_bytes(&data, &options).unwrap();
/// assert_eq!(download.filename, "converted.xlsx");
/// ```
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<Download> {
    Pipeline::for_options(options).run(data, options)
}

/// Convert a PDF file in one call.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<Download> {
    let data = read_input(path.as_ref())?;
    convert_bytes(&data, options)
}

/// Extract text lines from a PDF file.
///
/// # Example
///
/// ```no_run
/// let lines = pdf2office::extract_lines("notes.pdf", Default::default()).unwrap();
/// for line in lines {
///     println!("{}", line);
/// }
/// ```
pub fn extract_lines<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<TextLines> {
    let data = read_input(path.as_ref())?;
    PdfExtractor::with_options(options).extract_lines(&data)
}

/// Extract detected tables from a PDF file.
pub fn extract_tables<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Vec<Table>> {
    let data = read_input(path.as_ref())?;
    PdfExtractor::with_options(options).extract_tables(&data)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bytes_empty_data() {
        let result = convert_bytes(&[], &ConvertOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        let err = convert_bytes(data, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_convert_file_missing() {
        let err = convert_file("/nonexistent/input.pdf", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ReadInput { .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_session_default_is_idle() {
        let session: Session = Session::default();
        assert_eq!(session.state(), &SessionState::Idle);
    }
}
