use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};

use super::error::DataError;
use super::model::{CellValue, Table};

/// Columns every bank-marketing upload must carry: `age` feeds the range
/// slider, `y` is the distribution target.
pub const REQUIRED_COLUMNS: [&str; 2] = ["age", "y"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a [`Table`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – semicolon-delimited text with a header row
/// * `.xlsx` – spreadsheet; only the first sheet is read
pub fn load_bytes(file_name: &str, bytes: &[u8]) -> Result<Table, DataError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(bytes)?,
        "xlsx" => load_xlsx(bytes)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    validate(&table)?;
    log::info!(
        "Loaded {} rows x {} columns from {file_name}",
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

fn validate(table: &Table) -> Result<(), DataError> {
    let mut seen = BTreeSet::new();
    for col in &table.columns {
        if !seen.insert(col.as_str()) {
            return Err(DataError::Load(format!("duplicate column name '{col}'")));
        }
    }
    for required in REQUIRED_COLUMNS {
        if table.column_index(required).is_none() {
            return Err(DataError::Load(format!(
                "missing required column '{required}'"
            )));
        }
    }
    if table.is_empty() {
        return Err(DataError::Load("file contains no data rows".to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Semicolon-delimited layout, header row first:
///   `age;job;marital;...;y`
///   `56;housemaid;married;...;no`
fn load_csv(bytes: &[u8]) -> Result<Table, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Load(format!("reading CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::Load(format!("CSV row {row_no}: {e}")))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Table::new(columns, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first sheet of a workbook. The first row is the header; every
/// following row becomes a table row, padded with nulls if it is short.
fn load_xlsx(bytes: &[u8]) -> Result<Table, DataError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| DataError::Load(format!("opening workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::Load("workbook has no sheets".to_string()))?
        .map_err(|e| DataError::Load(format!("reading first sheet: {e}")))?;

    let mut sheet_rows = range.rows();
    let columns: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| DataError::Load("first sheet is empty".to_string()))?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows: Vec<Vec<CellValue>> = sheet_rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(cell_from_sheet).collect();
            cells.resize(columns.len(), CellValue::Null);
            cells.truncate(columns.len());
            cells
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_from_sheet(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(s.trim().to_string())
            }
        }
        Data::Int(i) => CellValue::Integer(*i),
        // Spreadsheets store integers as floats; fold integral values back.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            CellValue::Integer(*f as i64)
        }
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => {
            log::warn!("cell error in sheet: {e:?}");
            CellValue::Null
        }
        other => CellValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "age;job;marital;y\n25;admin;single;yes\n60;blue-collar;married;no\n";

    #[test]
    fn csv_parses_semicolon_delimited_rows() {
        let table = load_bytes("bank.csv", SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["age", "job", "marital", "y"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::Integer(25));
        assert_eq!(table.rows[1][1], CellValue::String("blue-collar".into()));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_bytes("bank.txt", SAMPLE_CSV.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn corrupt_xlsx_is_a_load_error() {
        let err = load_bytes("bank.xlsx", b"not a zip archive").unwrap_err();
        assert!(matches!(err, DataError::Load(_)));
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let err = load_bytes("bank.csv", b"age;job\n25;admin\n").unwrap_err();
        assert!(matches!(err, DataError::Load(msg) if msg.contains("'y'")));
    }

    #[test]
    fn duplicate_header_is_a_load_error() {
        let err = load_bytes("bank.csv", b"age;y;y\n25;yes;no\n").unwrap_err();
        assert!(matches!(err, DataError::Load(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn header_only_file_is_a_load_error() {
        let err = load_bytes("bank.csv", b"age;y\n").unwrap_err();
        assert!(matches!(err, DataError::Load(msg) if msg.contains("no data rows")));
    }

    #[test]
    fn empty_cells_become_null() {
        let table = load_bytes("bank.csv", b"age;job;y\n25;;yes\n").unwrap();
        assert_eq!(table.rows[0][1], CellValue::Null);
    }
}
