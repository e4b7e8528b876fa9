//! CSV sheet reader.

use std::path::Path;

use crate::error::ImportResult;
use crate::types::RawTable;

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Read a CSV file into a [`RawTable`].
///
/// Rules:
///
/// - comma-delimited; the first record is the header row
/// - rows may have different lengths
/// - cells are trimmed and stray double quotes are removed
/// - blank lines are dropped
/// - bytes that are not valid UTF-8 (e.g. Windows-1252 exports) become `U+FFFD`; the row is
///   kept
pub fn read_csv_table_from_path(path: impl AsRef<Path>) -> ImportResult<RawTable> {
    let mut rdr = reader_builder().from_path(path)?;
    read_csv_table_from_reader(&mut rdr)
}

/// Read CSV text already in memory.
pub fn read_csv_table_from_str(text: &str) -> ImportResult<RawTable> {
    let mut rdr = reader_builder().from_reader(text.as_bytes());
    read_csv_table_from_reader(&mut rdr)
}

/// Read from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)`, otherwise the header row is consumed
/// before this function sees it.
pub fn read_csv_table_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ImportResult<RawTable> {
    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let row: Vec<String> = record
            .iter()
            .map(|raw| clean_cell(&String::from_utf8_lossy(raw)))
            .collect();
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    if let Some(first) = rows.first_mut().and_then(|r| r.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.trim().to_string();
        }
    }

    tracing::debug!(rows = rows.len(), "csv table read");
    Ok(RawTable::new(rows))
}

fn clean_cell(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}
