//! Text and table extraction backed by lopdf.

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::read_header;
use crate::error::{Error, Result};
use crate::model::{Table, TextLines};

use super::line_builder::group_into_lines;
use super::options::{ErrorMode, ExtractOptions, PageSelection};
use super::spans::SpanReader;
use super::table_detector::TableDetector;
use super::Extractor;

/// [`Extractor`] that parses PDFs with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Count the pages of a PDF without extracting anything.
    pub fn page_count(&self, data: &[u8]) -> Result<u32> {
        Ok(self.load(data)?.get_pages().len() as u32)
    }

    fn load(&self, data: &[u8]) -> Result<LopdfDocument> {
        let header = read_header(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        // No password support; lopdf already tried the empty user password.
        if doc.is_encrypted() {
            log::warn!("{} document is encrypted, text may be unreadable", header);
        }

        Ok(doc)
    }

    /// Selected pages in document order as (page number, object id).
    fn selected_pages(&self, doc: &LopdfDocument) -> Result<Vec<(u32, ObjectId)>> {
        let pages = doc.get_pages();
        let total = pages.len() as u32;

        if let PageSelection::Pages(wanted) = &self.options.pages {
            if let Some(&missing) = wanted.iter().find(|p| **p > total) {
                return Err(Error::PageOutOfRange(missing, total));
            }
        }
        if let PageSelection::Range(range) = &self.options.pages {
            if *range.start() > total {
                return Err(Error::PageOutOfRange(*range.start(), total));
            }
        }

        Ok(pages
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect())
    }

    /// Apply the error mode to a per-page result.
    fn per_page<T: Default>(&self, page_num: u32, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page_num, e);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }
}

impl Extractor for PdfExtractor {
    fn extract_lines(&self, pdf: &[u8]) -> Result<TextLines> {
        let doc = self.load(pdf)?;
        let reader = SpanReader::new(&doc);
        let mut lines = TextLines::new();

        for (page_num, page_id) in self.selected_pages(&doc)? {
            let spans = self.per_page(page_num, reader.page_spans(page_id))?;
            let page_lines = group_into_lines(&spans);
            log::debug!("page {}: {} lines", page_num, page_lines.len());
            lines.extend(page_lines);
        }

        Ok(lines)
    }

    fn extract_tables(&self, pdf: &[u8]) -> Result<Vec<Table>> {
        let doc = self.load(pdf)?;
        let reader = SpanReader::new(&doc);
        let detector = TableDetector::with_config(self.options.table_config.clone());
        let mut tables = Vec::new();

        for (page_num, page_id) in self.selected_pages(&doc)? {
            let spans = self.per_page(page_num, reader.page_spans(page_id))?;
            let found = detector.extract(&spans, page_num);
            log::debug!("page {}: {} tables", page_num, found.len());
            tables.extend(found);
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract_lines(b"<html>not a pdf</html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract_tables(b"%PDF-1.4\n1 0 obj\n<<");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            crate::error::ErrorKind::MalformedInput
        );
    }

    #[test]
    fn test_options_are_kept() {
        let extractor = PdfExtractor::with_options(ExtractOptions::new().lenient());
        assert_eq!(extractor.options().error_mode, ErrorMode::Lenient);
    }
}
