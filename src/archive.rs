//! Single-entry ZIP packaging.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Result;
use crate::model::{Archive, OutputDocument};

/// Filename of every archive, whatever it wraps.
pub const ARCHIVE_FILENAME: &str = "converted.zip";

/// Wraps an encoded document in a compressed archive.
pub trait Archiver {
    /// Produce an archive holding exactly one entry: `doc.bytes` under `doc.filename`.
    fn wrap(&self, doc: &OutputDocument) -> Result<Archive>;
}

impl<T: Archiver + ?Sized> Archiver for &T {
    fn wrap(&self, doc: &OutputDocument) -> Result<Archive> {
        (**self).wrap(doc)
    }
}

/// Deflate-compressed ZIP archiver.
///
/// Entry timestamps are pinned to the ZIP epoch, so the same document always
/// yields the same archive bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ZipArchiver {
    fn wrap(&self, doc: &OutputDocument) -> Result<Archive> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(doc.filename.as_str(), options)?;
        writer.write_all(&doc.bytes)?;
        let bytes = writer.finish()?.into_inner();

        log::debug!(
            "archived {} ({} -> {} bytes)",
            doc.filename,
            doc.bytes.len(),
            bytes.len()
        );

        Ok(Archive {
            bytes,
            filename: ARCHIVE_FILENAME.to_string(),
            entry_name: doc.filename.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentKind;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample() -> OutputDocument {
        OutputDocument::new(
            b"not really a workbook".repeat(20),
            "converted.xlsx",
            DocumentKind::Spreadsheet,
        )
    }

    #[test]
    fn test_single_entry_round_trip() {
        let doc = sample();
        let archive = ZipArchiver::new().wrap(&doc).unwrap();

        assert_eq!(archive.filename, "converted.zip");
        assert_eq!(archive.entry_name, "converted.xlsx");

        let mut zip = ZipArchive::new(archive.reader()).unwrap();
        assert_eq!(zip.len(), 1);

        let mut entry = zip.by_index(0).unwrap();
        assert_eq!(entry.name(), "converted.xlsx");
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, doc.bytes);
    }

    #[test]
    fn test_archive_is_deterministic() {
        let doc = sample();
        let first = ZipArchiver::new().wrap(&doc).unwrap();
        let second = ZipArchiver::new().wrap(&doc).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_empty_document_still_archived() {
        let doc = OutputDocument::new(Vec::new(), "converted.docx", DocumentKind::WordDocument);
        let archive = ZipArchiver::new().wrap(&doc).unwrap();
        let mut zip = ZipArchive::new(archive.reader()).unwrap();
        assert_eq!(zip.by_name("converted.docx").unwrap().size(), 0);
    }
}
