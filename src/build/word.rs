//! Word document encoding with docx-rs.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use crate::error::{Error, Result};

/// Encode text lines as one paragraph each. Empty lines become empty paragraphs.
pub fn lines_to_docx(lines: &[String]) -> Result<Vec<u8>> {
    let docx = lines
        .iter()
        .enumerate()
        .fold(Docx::new(), |docx, (i, line)| docx.add_paragraph(paragraph_for(i, line)));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| Error::WordDocument(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Paragraph ids follow line order so identical input packs to identical bytes.
fn paragraph_for(index: usize, line: &str) -> Paragraph {
    let paragraph = Paragraph::new().id(format!("{:08X}", index + 1));
    let text = strip_xml_invalid(line);
    if text.is_empty() {
        paragraph
    } else {
        paragraph.add_run(Run::new().add_text(text))
    }
}

/// XML 1.0 forbids most C0 control characters; PDFs occasionally leak them.
fn strip_xml_invalid(s: &str) -> String {
    s.chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || c >= ' ')
        .collect()
}
