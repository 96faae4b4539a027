//! Encoded output buffers.

use std::io::Cursor;

/// Logical kind of an [`OutputDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Excel workbook (`.xlsx`)
    Spreadsheet,
    /// Word document (`.docx`)
    WordDocument,
}

impl DocumentKind {
    /// MIME type for downloads of this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentKind::WordDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Spreadsheet => "xlsx",
            DocumentKind::WordDocument => "docx",
        }
    }
}

/// A fully encoded spreadsheet or word-processor document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// Encoded file contents
    pub bytes: Vec<u8>,
    /// Download file name (e.g. `converted.xlsx`)
    pub filename: String,
    /// What the bytes encode
    pub kind: DocumentKind,
}

impl OutputDocument {
    /// Create a new output document.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            kind,
        }
    }

    /// MIME type of the encoded document.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    /// File extension of the encoded document, without the dot.
    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    /// A reader positioned at the start of the buffer.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }

    /// Size of the encoded document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A compressed archive wrapping exactly one [`OutputDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Encoded archive contents
    pub bytes: Vec<u8>,
    /// Download file name (always `converted.zip`)
    pub filename: String,
    /// Name of the single entry inside the archive
    pub entry_name: String,
}

impl Archive {
    /// MIME type of the archive.
    pub fn mime_type(&self) -> &'static str {
        "application/zip"
    }

    /// A reader positioned at the start of the buffer.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_document_kind_metadata() {
        assert_eq!(DocumentKind::Spreadsheet.extension(), "xlsx");
        assert_eq!(DocumentKind::WordDocument.extension(), "docx");
        assert!(DocumentKind::WordDocument
            .mime_type()
            .ends_with("wordprocessingml.document"));
    }

    #[test]
    fn test_reader_starts_at_beginning() {
        let doc = OutputDocument::new(b"PK\x03\x04".to_vec(), "converted.xlsx", DocumentKind::Spreadsheet);
        let mut buf = Vec::new();
        doc.reader().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, doc.bytes);
        assert_eq!(doc.len(), 4);
        assert!(!doc.is_empty());
    }
}
