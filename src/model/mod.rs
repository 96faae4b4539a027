//! Data model shared by the extraction, building, and packaging stages.
//!
//! Nothing here outlives a single conversion request.

mod output;
mod table;

pub use output::{Archive, DocumentKind, OutputDocument};
pub use table::{Cell, Table, TableRow};

/// Lines of extracted text, in page order then in-page order.
pub type TextLines = Vec<String>;
