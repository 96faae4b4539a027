//! Excel workbook encoding with rust_xlsxwriter.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};

use crate::error::{Error, Result};
use crate::model::Table;

/// Sheet holding extracted text lines.
pub const TEXT_SHEET_NAME: &str = "Extracted Text";

/// Header cell above the extracted lines.
pub const TEXT_COLUMN_HEADER: &str = "Text";

/// Sheet name for the table at 0-based `index`: `Table_1`, `Table_2`, ...
pub fn table_sheet_name(index: usize) -> String {
    format!("Table_{}", index + 1)
}

/// Encode text lines as a one-column workbook.
///
/// Row 0 holds the `Text` header; line `i` lands in row `i + 1`. Empty lines
/// leave their row blank. Readers stop at the last written cell, so trailing
/// empty lines do not show up as rows.
pub fn lines_to_xlsx(lines: &[String]) -> Result<Vec<u8>> {
    let mut workbook = new_workbook()?;
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TEXT_SHEET_NAME)?;
    sheet.write_string_with_format(0, 0, TEXT_COLUMN_HEADER, &header_format)?;
    for (i, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            sheet.write_string(row_index(i + 1)?, 0, line)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Encode tables as one sheet each, cells copied verbatim.
pub fn tables_to_xlsx(tables: &[Table]) -> Result<Vec<u8>> {
    let mut workbook = new_workbook()?;

    for (index, table) in tables.iter().enumerate() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(table_sheet_name(index))?;
        write_table(sheet, table)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_table(sheet: &mut Worksheet, table: &Table) -> Result<()> {
    for (r, row) in table.rows.iter().enumerate() {
        let r = row_index(r)?;
        for (c, cell) in row.cells.iter().enumerate() {
            if let Some(text) = cell.as_deref().filter(|t| !t.is_empty()) {
                sheet.write_string(r, column_index(c)?, text)?;
            }
        }
    }
    Ok(())
}

/// Workbook with a pinned creation date so identical input gives identical bytes.
fn new_workbook() -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    Ok(workbook)
}

fn row_index(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| Error::Spreadsheet(format!("row {} exceeds sheet limits", i)))
}

fn column_index(i: usize) -> Result<u16> {
    u16::try_from(i).map_err(|_| Error::Spreadsheet(format!("column {} exceeds sheet limits", i)))
}
