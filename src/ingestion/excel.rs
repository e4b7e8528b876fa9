#![cfg(feature = "excel")]

//! Excel/ODS sheet reader.
//!
//! Cells are turned into the same text a user would have typed in a Brazilian spreadsheet, so
//! the parsers in [`crate::parsing`] see one notation regardless of the source format.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::error::{ImportError, ImportResult};
use crate::types::RawTable;

/// Read one sheet of a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`) into a [`RawTable`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - The first non-empty row is the header row; fully blank rows are dropped
/// - Whole numbers become integers (`2`), other numbers use a decimal comma (`29,8`)
/// - Date cells become their serial day count (`45658`), which the date parser understands
pub fn read_excel_table_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> ImportResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    read_sheet(&mut workbook, sheet_name)
}

/// Same as [`read_excel_table_from_path`], for a workbook already in memory.
pub fn read_excel_table_from_bytes(
    bytes: &[u8],
    sheet_name: Option<&str>,
) -> ImportResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    read_sheet(&mut workbook, sheet_name)
}

fn read_sheet<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet_name: Option<&str>,
) -> ImportResult<RawTable> {
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    if rows.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        });
    }

    tracing::debug!(sheet = %sheet, rows = rows.len(), "excel table read");
    Ok(RawTable::new(rows))
}

fn cell_to_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.replace('"', "").trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => number_to_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn number_to_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string().replace('.', ",")
    }
}

fn serial_to_text(serial: f64) -> String {
    if serial.fract() == 0.0 {
        (serial as i64).to_string()
    } else {
        serial.to_string()
    }
}
