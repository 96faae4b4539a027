//! PDF content extraction.
//!
//! [`Extractor`] is the seam between the conversion flow and the PDF
//! library; [`PdfExtractor`] is the lopdf-backed implementation.

mod line_builder;
mod options;
mod pdf_extractor;
mod spans;
mod table_detector;

pub use options::{ErrorMode, ExtractOptions, PageSelection};
pub use pdf_extractor::PdfExtractor;
pub use spans::{SpanReader, TextSpan};
pub use table_detector::{DetectedTable, SpanRow, TableDetector, TableDetectorConfig};

use crate::error::Result;
use crate::model::{Table, TextLines};

/// Pulls plain text lines or tables out of a PDF byte source.
pub trait Extractor {
    /// Extract text lines in page order, then in-page order.
    ///
    /// Pages without extractable text contribute no lines.
    fn extract_lines(&self, pdf: &[u8]) -> Result<TextLines>;

    /// Extract every non-empty table, in page order then detection order.
    fn extract_tables(&self, pdf: &[u8]) -> Result<Vec<Table>>;
}

impl<T: Extractor + ?Sized> Extractor for &T {
    fn extract_lines(&self, pdf: &[u8]) -> Result<TextLines> {
        (**self).extract_lines(pdf)
    }

    fn extract_tables(&self, pdf: &[u8]) -> Result<Vec<Table>> {
        (**self).extract_tables(pdf)
    }
}
