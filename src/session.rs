//! Interactive conversion session.
//!
//! A [`Session`] holds what the form currently shows: the uploaded file, the
//! selected options and the outcome of the last trigger. It moves through
//! [`SessionState`]:
//!
//! ```text
//! Idle --upload--> Ready --trigger--> Converting --> Done | NothingToConvert | Failed
//! ```
//!
//! The three outcomes are terminal for one request. Triggering again, changing
//! an option, or uploading another file starts over from `Ready`.

use std::fmt;

use crate::archive::{Archiver, ZipArchiver};
use crate::build::{DocumentBuilder, OfficeBuilder};
use crate::convert::{ConvertOptions, Download, ExcelSource, OutputFormat, Pipeline};
use crate::error::{ErrorKind, Result};
use crate::parser::{Extractor, PdfExtractor};

/// Where a session is in the conversion flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No file uploaded
    #[default]
    Idle,
    /// File uploaded, options may be changed
    Ready,
    /// Pipeline running
    Converting,
    /// Artifact available for download
    Done(Download),
    /// Table mode found no tables
    NothingToConvert,
    /// Extraction or encoding failed
    Failed(String),
}

impl SessionState {
    /// Whether this is one of the per-request outcomes.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Done(_) | SessionState::NothingToConvert | SessionState::Failed(_)
        )
    }
}

/// Severity of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Warning,
    Error,
}

/// Text for the form's status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An uploaded PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-side file name
    pub name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// One user's form: upload, options, trigger and outcome.
///
/// Conversions are single-flight: [`Session::trigger`] runs the whole
/// pipeline before returning, so there is never more than one in progress.
#[derive(Debug)]
pub struct Session<E = PdfExtractor, B = OfficeBuilder, A = ZipArchiver> {
    pipeline: Pipeline<E, B, A>,
    options: ConvertOptions,
    upload: Option<Upload>,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Pipeline::new())
    }
}

impl<E, B, A> Session<E, B, A>
where
    E: Extractor,
    B: DocumentBuilder,
    A: Archiver,
{
    /// Create an idle session with default options.
    pub fn new(pipeline: Pipeline<E, B, A>) -> Self {
        Self::with_options(pipeline, ConvertOptions::default())
    }

    /// Create an idle session with preset options.
    pub fn with_options(pipeline: Pipeline<E, B, A>, options: ConvertOptions) -> Self {
        Self {
            pipeline,
            options,
            upload: None,
            state: SessionState::Idle,
        }
    }

    /// Accept an uploaded file. Any earlier outcome is discarded.
    pub fn upload(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let upload = Upload {
            name: name.into(),
            bytes,
        };
        log::debug!("upload {} ({} bytes)", upload.name, upload.bytes.len());
        self.upload = Some(upload);
        self.state = SessionState::Ready;
    }

    /// Drop the uploaded file and return to `Idle`.
    pub fn clear(&mut self) {
        self.upload = None;
        self.state = SessionState::Idle;
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.options.format = format;
        self.invalidate();
    }

    pub fn set_compress(&mut self, compress: bool) {
        self.options.compress = compress;
        self.invalidate();
    }

    pub fn set_excel_source(&mut self, source: ExcelSource) {
        self.options.excel_source = source;
        self.invalidate();
    }

    /// Run the conversion with the current file and options.
    ///
    /// Without an upload this does nothing and the session stays `Idle`.
    pub fn trigger(&mut self) -> &SessionState {
        let Some(upload) = &self.upload else {
            log::debug!("trigger ignored: no file uploaded");
            return &self.state;
        };

        self.state = SessionState::Converting;
        let result = self.pipeline.run(&upload.bytes, &self.options);
        self.state = outcome(result);
        &self.state
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn uploaded(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// The artifact, offered only after a fully successful run.
    pub fn download(&self) -> Option<&Download> {
        match &self.state {
            SessionState::Done(download) => Some(download),
            _ => None,
        }
    }

    /// Label for the download button.
    pub fn download_label(&self) -> Option<String> {
        self.download().map(|_| {
            if self.options.compress {
                "Download ZIP File".to_string()
            } else {
                format!("Download {} File", self.options.format)
            }
        })
    }

    /// What the status area should show for the last outcome.
    pub fn status_message(&self) -> Option<StatusMessage> {
        match &self.state {
            SessionState::Idle | SessionState::Ready => None,
            SessionState::Converting => Some(StatusMessage::new(
                StatusLevel::Warning,
                "Extracting and converting...",
            )),
            SessionState::Done(_) if self.options.compress => Some(StatusMessage::new(
                StatusLevel::Success,
                "Conversion complete! File compressed as ZIP.",
            )),
            SessionState::Done(_) => Some(StatusMessage::new(
                StatusLevel::Success,
                format!("Conversion to {} complete!", self.options.format),
            )),
            SessionState::NothingToConvert => Some(StatusMessage::new(
                StatusLevel::Warning,
                "No tables found in the PDF.",
            )),
            SessionState::Failed(reason) => Some(StatusMessage::new(
                StatusLevel::Error,
                format!("Conversion failed: {}", reason),
            )),
        }
    }

    /// An option changed: a shown outcome no longer matches the form.
    fn invalidate(&mut self) {
        if self.state.is_terminal() {
            self.state = SessionState::Ready;
        }
    }
}

fn outcome(result: Result<Download>) -> SessionState {
    match result {
        Ok(download) => SessionState::Done(download),
        Err(e) if e.kind() == ErrorKind::EmptyResult => {
            log::info!("nothing to convert: {}", e);
            SessionState::NothingToConvert
        }
        Err(e) => {
            log::warn!("conversion failed: {}", e);
            SessionState::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;
    use crate::testing::{FailingArchiver, FakeExtractor, RecordingBuilder};

    fn session(extractor: FakeExtractor) -> Session<FakeExtractor, RecordingBuilder, ZipArchiver> {
        Session::new(Pipeline::with_parts(
            extractor,
            RecordingBuilder::default(),
            ZipArchiver::new(),
        ))
    }

    #[test]
    fn test_starts_idle_and_trigger_without_upload_is_noop() {
        let mut s = session(FakeExtractor::with_lines(&["a"]));
        assert_eq!(s.state(), &SessionState::Idle);
        assert_eq!(s.trigger(), &SessionState::Idle);
        assert!(s.status_message().is_none());
    }

    #[test]
    fn test_upload_then_convert_word() {
        let mut s = session(FakeExtractor::with_lines(&["a", "", "b"]));
        s.upload("report.pdf", b"%PDF-1.7".to_vec());
        assert_eq!(s.state(), &SessionState::Ready);
        assert!(s.download().is_none());

        s.set_format(OutputFormat::Word);
        s.trigger();

        let download = s.download().unwrap();
        assert_eq!(download.filename, "converted.docx");
        assert_eq!(s.download_label().unwrap(), "Download Word File");
        let status = s.status_message().unwrap();
        assert_eq!(status.level, StatusLevel::Success);
        assert_eq!(status.text, "Conversion to Word complete!");
    }

    #[test]
    fn test_no_tables_reaches_nothing_to_convert() {
        let mut s = session(FakeExtractor::with_tables(Vec::new()));
        s.upload("scan.pdf", Vec::new());
        s.set_compress(true);

        assert_eq!(s.trigger(), &SessionState::NothingToConvert);
        assert!(s.download().is_none());
        assert!(s.download_label().is_none());
        assert_eq!(s.status_message().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn test_failure_offers_no_download() {
        let mut s = session(FakeExtractor::failing());
        s.upload("broken.pdf", b"garbage".to_vec());

        assert!(matches!(s.trigger(), SessionState::Failed(_)));
        assert!(s.download().is_none());
        let status = s.status_message().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.starts_with("Conversion failed"));
    }

    #[test]
    fn test_archive_failure_is_failed() {
        let mut s = Session::new(Pipeline::with_parts(
            FakeExtractor::with_lines(&["x"]),
            RecordingBuilder::default(),
            FailingArchiver,
        ));
        s.upload("a.pdf", Vec::new());
        s.set_format(OutputFormat::Word);
        s.set_compress(true);

        assert!(matches!(s.trigger(), SessionState::Failed(_)));
    }

    #[test]
    fn test_zip_status_and_label() {
        let table = Table::from_strings(vec![vec!["a", "b"]]);
        let mut s = session(FakeExtractor::with_tables(vec![table]));
        s.upload("t.pdf", Vec::new());
        s.set_compress(true);
        s.trigger();

        assert_eq!(s.download().unwrap().filename, "converted.zip");
        assert_eq!(s.download_label().unwrap(), "Download ZIP File");
        assert_eq!(
            s.status_message().unwrap().text,
            "Conversion complete! File compressed as ZIP."
        );
    }

    #[test]
    fn test_retrigger_uses_current_options() {
        let mut s = session(FakeExtractor::with_lines(&["line"]));
        s.upload("doc.pdf", Vec::new());
        s.set_excel_source(ExcelSource::Text);
        s.trigger();
        assert_eq!(s.download().unwrap().filename, "converted.xlsx");

        s.set_format(OutputFormat::Word);
        assert_eq!(s.state(), &SessionState::Ready);
        s.trigger();
        assert_eq!(s.download().unwrap().filename, "converted.docx");
    }

    #[test]
    fn test_clear_and_new_upload() {
        let mut s = session(FakeExtractor::with_lines(&["line"]));
        s.upload("one.pdf", Vec::new());
        s.set_format(OutputFormat::Word);
        s.trigger();
        assert!(s.state().is_terminal());

        s.upload("two.pdf", Vec::new());
        assert_eq!(s.state(), &SessionState::Ready);
        assert_eq!(s.uploaded().unwrap().name, "two.pdf");

        s.clear();
        assert_eq!(s.state(), &SessionState::Idle);
        assert!(s.uploaded().is_none());
    }
}
