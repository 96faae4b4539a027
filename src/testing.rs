//! In-memory stand-ins for the extraction, build and archive seams.

use std::cell::RefCell;

use crate::archive::Archiver;
use crate::build::DocumentBuilder;
use crate::error::{Error, Result};
use crate::model::{Archive, DocumentKind, OutputDocument, Table, TextLines};
use crate::parser::Extractor;

/// Returns canned content, or a parse error when `fail` is set.
#[derive(Debug, Default)]
pub(crate) struct FakeExtractor {
    pub lines: TextLines,
    pub tables: Vec<Table>,
    pub fail: bool,
}

impl FakeExtractor {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_tables(tables: Vec<Table>) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl Extractor for FakeExtractor {
    fn extract_lines(&self, _pdf: &[u8]) -> Result<TextLines> {
        if self.fail {
            return Err(Error::PdfParse("fake parse failure".into()));
        }
        Ok(self.lines.clone())
    }

    fn extract_tables(&self, _pdf: &[u8]) -> Result<Vec<Table>> {
        if self.fail {
            return Err(Error::PdfParse("fake parse failure".into()));
        }
        Ok(self.tables.clone())
    }
}

/// Records which build operation ran; output bytes are the joined text.
#[derive(Debug, Default)]
pub(crate) struct RecordingBuilder {
    pub calls: RefCell<Vec<&'static str>>,
}

impl RecordingBuilder {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl DocumentBuilder for RecordingBuilder {
    fn build_spreadsheet_from_lines(&self, lines: &[String]) -> Result<OutputDocument> {
        self.calls.borrow_mut().push("lines");
        Ok(OutputDocument::new(
            lines.join("\n").into_bytes(),
            "converted.xlsx",
            DocumentKind::Spreadsheet,
        ))
    }

    fn build_spreadsheet_from_tables(&self, tables: &[Table]) -> Result<OutputDocument> {
        self.calls.borrow_mut().push("tables");
        let text: Vec<String> = tables.iter().map(Table::plain_text).collect();
        Ok(OutputDocument::new(
            text.join("\n").into_bytes(),
            "converted_tables.xlsx",
            DocumentKind::Spreadsheet,
        ))
    }

    fn build_word_document(&self, lines: &[String]) -> Result<OutputDocument> {
        self.calls.borrow_mut().push("word");
        Ok(OutputDocument::new(
            lines.join("\n").into_bytes(),
            "converted.docx",
            DocumentKind::WordDocument,
        ))
    }
}

/// Archiver that always fails to write.
#[derive(Debug, Default)]
pub(crate) struct FailingArchiver;

impl Archiver for FailingArchiver {
    fn wrap(&self, _doc: &OutputDocument) -> Result<Archive> {
        Err(Error::Archive("no space left".into()))
    }
}
