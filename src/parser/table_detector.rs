//! Table detection using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone, without ruling lines: spans
//! are grouped into rows by baseline, left edges that line up across rows
//! become column boundaries, and runs of consecutive aligned rows become
//! tables.

use std::collections::{HashMap, HashSet};

use crate::model::{Table, TableRow};

use super::spans::TextSpan;

/// Width of the buckets used to group left edges, in points.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span may sit from a column edge and still count as aligned.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Slack allowed for spans that start slightly left of their column.
const COLUMN_SLACK: f32 = 10.0;

/// A detected table region with its spans.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Detected column boundaries (X coordinates of left edges)
    pub columns: Vec<f32>,
    /// Rows of spans, top to bottom
    pub rows: Vec<SpanRow>,
    /// Right edge of the widest span in the region
    pub right_x: f32,
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct SpanRow {
    /// Average baseline of the row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 12,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in the spans of one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables on one page and convert them to the model type.
    ///
    /// Tables come back top to bottom; empty tables are never returned.
    pub fn extract(&self, spans: &[TextSpan], page: u32) -> Vec<Table> {
        self.detect(spans)
            .iter()
            .map(|d| self.to_table(d, page))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Detect table regions in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            log::debug!("TableDetector: only {} spans, skipping", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < cfg.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, page-level columns at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < cfg.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = rows[start..=end].to_vec();

            // Columns are re-detected per region; the page-level set mixes
            // edges from unrelated blocks.
            let region_columns = self.detect_columns(&region);
            if region_columns.len() < cfg.min_columns {
                continue;
            }
            if region_columns.len() > cfg.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    cfg.max_columns
                );
                continue;
            }
            if is_list_pattern(&region, &region_columns) {
                log::debug!("TableDetector: skipping region, looks like a list");
                continue;
            }

            let right_x = region
                .iter()
                .flat_map(|r| r.spans.iter())
                .map(TextSpan::right)
                .fold(f32::MIN, f32::max);

            tables.push(DetectedTable {
                columns: region_columns,
                rows: region,
                right_x,
            });
        }

        tables
    }

    /// Group spans into rows by Y position, top row first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut anchor_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match anchor_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    anchor_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Detect column boundaries from span left edges.
    ///
    /// Rows holding two or more spans are the best evidence of a grid; when
    /// there are too few of them every row is counted instead.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let (evidence, per_row_once): (Vec<&SpanRow>, bool) = if multi.len() >= self.config.min_rows
        {
            (multi, true)
        } else {
            (rows.iter().collect(), false)
        };
        if evidence.is_empty() {
            return vec![];
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &evidence {
            let buckets = row.spans.iter().map(|s| (s.x / EDGE_BUCKET).round() as i32);
            if per_row_once {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_occurrences =
            ((evidence.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous runs of rows that align with the columns.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Convert a detected region into a [`Table`], one cell per column.
    ///
    /// Spans falling into the same cell are joined with a space; columns that
    /// received no text become absent cells.
    pub fn to_table(&self, detected: &DetectedTable, page: u32) -> Table {
        let mut table = Table::on_page(page);

        for row in &detected.rows {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); detected.columns.len()];
            for span in &row.spans {
                let col = find_column_for_span(span.x, &detected.columns, detected.right_x);
                if let Some(cell) = cells.get_mut(col) {
                    cell.push(span.text.trim());
                }
            }

            table.add_row(TableRow::new(
                cells
                    .into_iter()
                    .map(|parts| {
                        let text = parts.join(" ");
                        (!text.is_empty()).then_some(text)
                    })
                    .collect(),
            ));
        }

        table
    }
}

fn make_row(mut spans: Vec<TextSpan>) -> SpanRow {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    SpanRow { y, spans }
}

/// Fraction of a row's spans that start on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Column index for a span's left edge; falls back to the nearest edge.
fn find_column_for_span(x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if x >= start - COLUMN_SLACK && x < end - COLUMN_SLACK {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (x - **a).abs().total_cmp(&(x - **b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Numbered or bulleted lists split into marker + text spans look like
/// two-column tables; catch them here.
fn is_list_pattern(rows: &[SpanRow], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let Some(first) = row.spans.iter().min_by(|a, b| a.x.total_cmp(&b.x)) else {
            continue;
        };
        let text = first.text.trim();
        if is_bullet_marker(text) {
            bullets += 1;
        } else if is_number_marker(text) {
            numbers += 1;
        }
    }

    let total = rows.len() as f32;
    // Bullets are almost never real table data. Numbered markers only
    // disqualify two-column regions, since real tables often number rows.
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "▶" | "➤"
    )
}

/// "1.", "12)", "3", "a.", "B)" and similar.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let body = cleaned
        .strip_suffix('.')
        .or_else(|| cleaned.strip_suffix(')'));
    match body {
        Some(b) if !b.is_empty() && b.chars().all(|c| c.is_ascii_digit()) => true,
        Some(b) => b.chars().count() == 1 && b.chars().all(char::is_alphabetic),
        None => false,
    }
}
