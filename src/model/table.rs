//! Table types.

use serde::{Deserialize, Serialize};

/// A single cell value. `None` means the detector found no text for the cell.
pub type Cell = Option<String>;

/// A table detected on a PDF page.
///
/// Rows are kept exactly as detected: the first row is not treated as a
/// header and rows may have differing lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, top to bottom
    pub rows: Vec<TableRow>,

    /// 1-based page number the table was found on (0 when unknown)
    pub page: u32,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table located on the given page.
    pub fn on_page(page: u32) -> Self {
        Self {
            rows: Vec::new(),
            page,
        }
    }

    /// Build a table from rows of text values. Every value becomes a present cell.
    ///
    /// ```
    /// use pdf2office::Table;
    ///
    /// let table = Table::from_strings(vec![vec!["a", "b"], vec!["1", "2"]]);
    /// assert_eq!(table.row_count(), 2);
    /// ```
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(TableRow::from_strings).collect(),
            page: 0,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table (tab-separated cells).
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row, left to right
    pub cells: Vec<Cell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Get a cell's text, if present.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\t")
    }
}
