//! Request-scoped conversion flow.
//!
//! A [`Pipeline`] wires an [`Extractor`], a [`DocumentBuilder`] and an
//! [`Archiver`] together and runs one conversion to completion:
//!
//! ```text
//! pdf bytes -> lines | tables -> OutputDocument -> (Archive) -> Download
//! ```
//!
//! All choices for a request live in [`ConvertOptions`]; nothing is kept
//! between runs.
//!
//! # Example
//!
//! ```no_run
//! use pdf2office::convert::{ConvertOptions, OutputFormat, Pipeline};
//!
//! fn main() -> pdf2office::Result<()> {
//!     let pdf = std::fs::read("report.pdf")?;
//!     let options = ConvertOptions::new()
//!         .with_format(OutputFormat::Word)
//!         .with_compress(true);
//!
//!     let download = Pipeline::for_options(&options).run(&pdf, &options)?;
//!     std::fs::write(&download.filename, &download.bytes)?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::archive::{Archiver, ZipArchiver};
use crate::build::{DocumentBuilder, OfficeBuilder};
use crate::error::{Error, Result};
use crate::model::{Archive, OutputDocument, Table};
use crate::parser::{ExtractOptions, Extractor, PageSelection, PdfExtractor};

/// Output document kind chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Excel workbook
    #[default]
    Excel,
    /// Word document
    Word,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Excel => write!(f, "Excel"),
            OutputFormat::Word => write!(f, "Word"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "word" | "docx" => Ok(OutputFormat::Word),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// What an Excel conversion is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExcelSource {
    /// Detected tables, one sheet each (`converted_tables.xlsx`)
    #[default]
    Tables,
    /// Plain text lines in a single column (`converted.xlsx`)
    Text,
}

/// Options for a single conversion request.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Output document kind
    pub format: OutputFormat,

    /// Wrap the document in `converted.zip`
    pub compress: bool,

    /// Source of Excel content; Word output always uses text lines
    pub excel_source: ExcelSource,

    /// Extraction tuning, applied when the pipeline is built
    pub extract: ExtractOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable zip packaging.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the Excel content source.
    pub fn with_excel_source(mut self, source: ExcelSource) -> Self {
        self.excel_source = source;
        self
    }

    /// Restrict extraction to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract.pages = pages;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Whether this request runs table detection.
    pub fn uses_tables(&self) -> bool {
        self.format == OutputFormat::Excel && self.excel_source == ExcelSource::Tables
    }
}

/// The artifact offered for download after a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
    /// MIME type for the response
    pub mime_type: &'static str,
}

impl Download {
    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the download is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<OutputDocument> for Download {
    fn from(doc: OutputDocument) -> Self {
        let mime_type = doc.mime_type();
        Self {
            filename: doc.filename,
            bytes: doc.bytes,
            mime_type,
        }
    }
}

impl From<Archive> for Download {
    fn from(archive: Archive) -> Self {
        let mime_type = archive.mime_type();
        Self {
            filename: archive.filename,
            bytes: archive.bytes,
            mime_type,
        }
    }
}

/// Extract, build and optionally archive, in one synchronous run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<E = PdfExtractor, B = OfficeBuilder, A = ZipArchiver> {
    extractor: E,
    builder: B,
    archiver: A,
}

impl Pipeline {
    /// Pipeline backed by lopdf, rust_xlsxwriter, docx-rs and zip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default pipeline whose extractor uses `options.extract`.
    pub fn for_options(options: &ConvertOptions) -> Self {
        Self::with_parts(
            PdfExtractor::with_options(options.extract.clone()),
            OfficeBuilder::new(),
            ZipArchiver::new(),
        )
    }
}

impl<E, B, A> Pipeline<E, B, A>
where
    E: Extractor,
    B: DocumentBuilder,
    A: Archiver,
{
    /// Assemble a pipeline from its three stages.
    pub fn with_parts(extractor: E, builder: B, archiver: A) -> Self {
        Self {
            extractor,
            builder,
            archiver,
        }
    }

    /// The builder this pipeline hands extracted content to.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Run one conversion.
    ///
    /// Table mode with no tables found returns [`Error::EmptyResult`] without
    /// touching the builder. No partial output is returned on failure.
    pub fn run(&self, pdf: &[u8], options: &ConvertOptions) -> Result<Download> {
        let document = self.build(pdf, options)?;

        let download: Download = if options.compress {
            self.archiver.wrap(&document)?.into()
        } else {
            document.into()
        };

        log::info!(
            "converted {} bytes of PDF into {} ({} bytes)",
            pdf.len(),
            download.filename,
            download.len()
        );
        Ok(download)
    }

    /// Extract and encode, without packaging.
    pub fn build(&self, pdf: &[u8], options: &ConvertOptions) -> Result<OutputDocument> {
        match options.format {
            OutputFormat::Excel if options.uses_tables() => {
                let tables: Vec<Table> = self
                    .extractor
                    .extract_tables(pdf)?
                    .into_iter()
                    .filter(|t| !t.is_empty())
                    .collect();
                if tables.is_empty() {
                    log::debug!("no tables detected");
                    return Err(Error::EmptyResult);
                }
                self.builder.build_spreadsheet_from_tables(&tables)
            }
            OutputFormat::Excel => {
                let lines = self.extractor.extract_lines(pdf)?;
                self.builder.build_spreadsheet_from_lines(&lines)
            }
            OutputFormat::Word => {
                let lines = self.extractor.extract_lines(pdf)?;
                self.builder.build_word_document(&lines)
            }
        }
    }
}
