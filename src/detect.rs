//! PDF header sniffing for uploaded files.
//!
//! Uploads are checked here before they reach the parser so that obviously
//! wrong files (HTML pages, images, empty uploads) fail fast with
//! [`Error::UnknownFormat`].

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Some producers emit junk before the header; readers accept it anywhere
/// in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Information read from a PDF header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Read the PDF header from in-memory bytes.
///
/// # Returns
/// * `Ok(PdfHeader)` if a `%PDF-x.y` marker is found near the start
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
/// * `Err(Error::UnsupportedVersion)` if the version is garbled
pub fn read_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version, offset })
}

/// Read the PDF header from a file on disk.
///
/// # Example
/// ```no_run
/// use pdf2office::detect::read_header_from_path;
///
/// let header = read_header_from_path("report.pdf").unwrap();
/// println!("PDF version: {}", header.version);
/// ```
pub fn read_header_from_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let path = path.as_ref();
    let unreadable = |source: std::io::Error| Error::ReadInput {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW + VERSION_LEN);
    file.take((HEADER_SEARCH_WINDOW + VERSION_LEN) as u64)
        .read_to_end(&mut head)
        .map_err(unreadable)?;
    read_header(&head)
}

/// Check if bytes look like a PDF upload.
pub fn looks_like_pdf(data: &[u8]) -> bool {
    read_header(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header_valid() {
        let header = read_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.offset, 0);
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_read_header_with_leading_junk() {
        let header = read_header(b"\xef\xbb\xbf\r\n%PDF-2.0\n").unwrap();
        assert_eq!(header.version, "2.0");
        assert_eq!(header.offset, 5);
    }

    #[test]
    fn test_read_header_rejects_html() {
        let result = read_header(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_read_header_too_short() {
        assert!(matches!(read_header(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(read_header(b"%PDF-1"), Err(Error::UnknownFormat)));
        assert!(matches!(read_header(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_read_header_bad_version() {
        let result = read_header(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "x.y"));
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.4\n"));
        assert!(!looks_like_pdf(b"PK\x03\x04 zip data"));
    }

    #[test]
    fn test_read_header_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"%PDF-1.6\n1 0 obj").unwrap();

        let header = read_header_from_path(file.path()).unwrap();
        assert_eq!(header.version, "1.6");
    }

    #[test]
    fn test_read_header_missing_file() {
        let err = read_header_from_path("/nonexistent/report.pdf").unwrap_err();
        assert!(matches!(err, Error::ReadInput { .. }));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}
