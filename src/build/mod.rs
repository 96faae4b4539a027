//! Office document encoding.
//!
//! [`DocumentBuilder`] turns extracted content into a named, typed
//! [`OutputDocument`]. [`OfficeBuilder`] writes `.xlsx` with rust_xlsxwriter
//! and `.docx` with docx-rs.

mod spreadsheet;
mod word;

pub use spreadsheet::{table_sheet_name, TEXT_COLUMN_HEADER, TEXT_SHEET_NAME};

use crate::error::{Error, Result};
use crate::model::{DocumentKind, OutputDocument, Table};

/// Filename of a workbook built from text lines.
pub const LINES_SPREADSHEET_NAME: &str = "converted.xlsx";

/// Filename of a workbook built from tables.
pub const TABLES_SPREADSHEET_NAME: &str = "converted_tables.xlsx";

/// Filename of a Word document.
pub const WORD_DOCUMENT_NAME: &str = "converted.docx";

/// Encodes extracted content as Office documents.
pub trait DocumentBuilder {
    /// One-column workbook: a `Text` header then one row per line.
    fn build_spreadsheet_from_lines(&self, lines: &[String]) -> Result<OutputDocument>;

    /// One sheet per table, named `Table_1`, `Table_2`, ... in input order.
    ///
    /// `tables` must be non-empty.
    fn build_spreadsheet_from_tables(&self, tables: &[Table]) -> Result<OutputDocument>;

    /// One paragraph per line, in order.
    fn build_word_document(&self, lines: &[String]) -> Result<OutputDocument>;
}

impl<T: DocumentBuilder + ?Sized> DocumentBuilder for &T {
    fn build_spreadsheet_from_lines(&self, lines: &[String]) -> Result<OutputDocument> {
        (**self).build_spreadsheet_from_lines(lines)
    }

    fn build_spreadsheet_from_tables(&self, tables: &[Table]) -> Result<OutputDocument> {
        (**self).build_spreadsheet_from_tables(tables)
    }

    fn build_word_document(&self, lines: &[String]) -> Result<OutputDocument> {
        (**self).build_word_document(lines)
    }
}

/// [`DocumentBuilder`] producing real `.xlsx` and `.docx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfficeBuilder;

impl OfficeBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBuilder for OfficeBuilder {
    fn build_spreadsheet_from_lines(&self, lines: &[String]) -> Result<OutputDocument> {
        let bytes = spreadsheet::lines_to_xlsx(lines)?;
        log::debug!("built {} ({} bytes)", LINES_SPREADSHEET_NAME, bytes.len());
        Ok(OutputDocument::new(
            bytes,
            LINES_SPREADSHEET_NAME,
            DocumentKind::Spreadsheet,
        ))
    }

    fn build_spreadsheet_from_tables(&self, tables: &[Table]) -> Result<OutputDocument> {
        if tables.is_empty() {
            return Err(Error::EmptyResult);
        }
        let bytes = spreadsheet::tables_to_xlsx(tables)?;
        log::debug!(
            "built {} with {} sheets ({} bytes)",
            TABLES_SPREADSHEET_NAME,
            tables.len(),
            bytes.len()
        );
        Ok(OutputDocument::new(
            bytes,
            TABLES_SPREADSHEET_NAME,
            DocumentKind::Spreadsheet,
        ))
    }

    fn build_word_document(&self, lines: &[String]) -> Result<OutputDocument> {
        let bytes = word::lines_to_docx(lines)?;
        log::debug!("built {} ({} bytes)", WORD_DOCUMENT_NAME, bytes.len());
        Ok(OutputDocument::new(
            bytes,
            WORD_DOCUMENT_NAME,
            DocumentKind::WordDocument,
        ))
    }
}
