//! Positioned text spans read from page content streams.
//!
//! Table detection needs to know where each piece of text sits on the page,
//! which plain text extraction throws away. This walks the text operators of
//! a page and records every shown string with its text-space origin.

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Default leading used by `T*` when no `TL` was set.
const DEFAULT_LEADING: f32 = 12.0;

/// Kerning adjustment (thousandths of an em) treated as a word gap in `TJ`.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run of text with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF coordinates: larger is higher)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating its width from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = estimate_width(&text, font_size);
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Reads [`TextSpan`]s from the pages of a loaded document.
pub struct SpanReader<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanReader<'a> {
    /// Create a reader over a loaded document.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract every non-blank text span on a page.
    pub fn page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        let raw = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&raw).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix.reset();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                        font_name = name.clone();
                        font_size = get_number(size).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        matrix.translate(get_number(tx).unwrap_or(0.0), get_number(ty).unwrap_or(0.0));
                    }
                }
                "TD" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        let ty = get_number(ty).unwrap_or(0.0);
                        matrix.leading = -ty;
                        matrix.translate(get_number(tx).unwrap_or(0.0), ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| get_number(o).unwrap_or(0.0))
                            .collect();
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        matrix.next_line();
                    }
                    if !in_text {
                        continue;
                    }
                    let operand = match op.operator.as_str() {
                        "\"" => op.operands.get(2),
                        _ => op.operands.first(),
                    };
                    let text = match operand {
                        Some(Object::String(bytes, _)) => self.decode(&fonts, &font_name, bytes),
                        Some(Object::Array(items)) => self.decode_array(&fonts, &font_name, items),
                        _ => continue,
                    };
                    let (x, y) = matrix.position();
                    matrix.advance(estimate_width(&text, font_size));
                    if !text.trim().is_empty() {
                        spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                    }
                }
                _ => {}
            }
        }

        log::debug!("page {:?}: read {} spans", page_id, spans.len());
        Ok(spans)
    }

    fn decode(
        &self,
        fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        fonts
            .get(font_name)
            .and_then(|font| font.get_font_encoding(self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Decode a `TJ` array, turning large negative kerning into word spaces.
    fn decode_array(
        &self,
        fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        items: &[Object],
    ) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(fonts, font_name, bytes)),
                other => {
                    let Some(adjustment) = get_number(other) else {
                        continue;
                    };
                    let needs_space = -adjustment > TJ_SPACE_THRESHOLD
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                    if needs_space {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

/// Half an em per character; close enough to place runs on a line.
fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Text state between `BT` and `ET`.
///
/// `a..f` is the line matrix. `advance` is how far shown text has moved the
/// pen along the current line, in text space.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
    advance: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: DEFAULT_LEADING,
            advance: 0.0,
        }
    }
}

impl TextMatrix {
    /// `BT` resets the matrix but leading is graphics state and survives.
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.advance = 0.0;
    }

    /// Move to the start of a new line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
        self.advance = 0.0;
    }

    fn advance(&mut self, tx: f32) {
        self.advance += tx;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (
            self.e + self.advance * self.a,
            self.f + self.advance * self.b,
        )
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without word spaces (Chinese, Japanese kana).
/// Hangul is not included: Korean uses spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0x20000..=0x2EBEF)
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_width_estimate() {
        let span = TextSpan::new("Name", 72.0, 700.0, 10.0);
        assert_eq!(span.width, 20.0);
        assert_eq!(span.right(), 92.0);
    }

    #[test]
    fn test_text_matrix_translate_and_next_line() {
        let mut m = TextMatrix::default();
        m.translate(100.0, 700.0);
        assert_eq!(m.position(), (100.0, 700.0));
        m.leading = 14.0;
        m.next_line();
        assert_eq!(m.position(), (100.0, 686.0));

        m.reset();
        assert_eq!(m.position(), (0.0, 0.0));
        assert_eq!(m.leading, 14.0);
    }

    #[test]
    fn test_shown_text_advances_until_next_line() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 700.0);
        m.advance(30.0);
        assert_eq!(m.position(), (102.0, 700.0));

        // Td and T* are relative to the line start, not the pen.
        m.translate(0.0, -14.0);
        assert_eq!(m.position(), (72.0, 686.0));
        m.advance(10.0);
        m.next_line();
        assert_eq!(m.position(), (72.0, 674.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        assert_eq!(m.scale(), 2.0);
        m.translate(5.0, 5.0);
        assert_eq!(m.position(), (20.0, 30.0));
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('漢'));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
