use rust_xlsxwriter::Workbook;

use super::error::DataError;
use super::model::{CellValue, Table};

/// Fixed download names, matching the dashboard's three export affordances.
pub const FILTERED_EXPORT_NAME: &str = "bank_filtered.xlsx";
pub const RAW_DIST_EXPORT_NAME: &str = "bank_raw_y.xlsx";
pub const FILTERED_DIST_EXPORT_NAME: &str = "bank_y.xlsx";

/// Encode a table as a single-sheet `.xlsx` byte buffer: header row with the
/// column names in original order, one row per table row, no index column.
/// Deterministic for a given table.
pub fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>, DataError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").map_err(export_err)?;

    for (c, name) in table.columns.iter().enumerate() {
        sheet
            .write_string(0, cell_col(c)?, name.as_str())
            .map_err(export_err)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let out_row = u32::try_from(r + 1)
            .map_err(|_| DataError::Export(format!("too many rows for a worksheet: {}", table.len())))?;
        for (c, value) in row.iter().enumerate() {
            let col = cell_col(c)?;
            match value {
                CellValue::String(s) => sheet.write_string(out_row, col, s.as_str()),
                CellValue::Integer(i) => sheet.write_number(out_row, col, *i as f64),
                CellValue::Float(f) => sheet.write_number(out_row, col, *f),
                CellValue::Bool(b) => sheet.write_boolean(out_row, col, *b),
                CellValue::Null => continue,
            }
            .map_err(export_err)?;
        }
    }

    workbook.save_to_buffer().map_err(export_err)
}

fn cell_col(c: usize) -> Result<u16, DataError> {
    u16::try_from(c).map_err(|_| DataError::Export(format!("too many columns for a worksheet: {c}")))
}

fn export_err(e: rust_xlsxwriter::XlsxError) -> DataError {
    DataError::Export(e.to_string())
}
