//! Reading-order text lines rebuilt from positioned spans.

use super::spans::TextSpan;

/// Baseline variance, as a fraction of font size, still treated as one line.
const LINE_Y_TOLERANCE: f32 = 0.3;

/// Horizontal gap, as a fraction of font size, that reads as a word break.
const WORD_GAP_FACTOR: f32 = 0.2;

/// Group spans into lines, top to bottom, each joined left to right.
pub fn group_into_lines(spans: &[TextSpan]) -> Vec<String> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut anchor_y: Option<f32> = None;

    for span in sorted {
        let tolerance = span.font_size * LINE_Y_TOLERANCE;
        match anchor_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(join_line(std::mem::take(&mut current)));
                }
                anchor_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(join_line(current));
    }

    lines
}

fn join_line(mut spans: Vec<TextSpan>) -> String {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut line = String::new();
    let mut prev_right: Option<f32> = None;
    for span in &spans {
        if let Some(right) = prev_right {
            let gap = span.x - right;
            let spaced = line.ends_with(char::is_whitespace)
                || span.text.starts_with(char::is_whitespace);
            if gap > span.font_size * WORD_GAP_FACTOR && !spaced {
                line.push(' ');
            }
        }
        line.push_str(&span.text);
        prev_right = Some(span.right());
    }
    line
}
