//! Core data model types for import.
//!
//! Sheet readers produce a [`RawTable`]; the orchestrator turns it into [`Sale`]s using a
//! [`ColumnMapping`] and reports skipped or malformed rows as [`ParseDiagnostic`]s.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};

/// Row-major text table. Row 0 is the header.
///
/// Rows may be ragged; a missing cell reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// All rows, header included.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from rows (header first).
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from string literals. Handy for fixed templates and tests.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Header cells, or an empty slice when the table has no rows.
    pub fn headers(&self) -> &[String] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Data rows paired with their table index (the header is index 0, so this starts at 1).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx, row.as_slice()))
    }

    /// Number of data rows (header excluded).
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Total row count, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Cell at `idx`, or `""` for ragged rows.
pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

/// True when a row has no cells or only blank cells.
pub(crate) fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// True for the trailing summary row convention (`row[0] == "Total"`).
pub(crate) fn is_total_row(row: &[String]) -> bool {
    row.first().map(|c| c.trim() == "Total").unwrap_or(false)
}

/// The two supported input layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// One row per calendar day: year/month/day, quantity and totals.
    DailyAggregated,
    /// One row per sale: date, gross value, net value.
    Transactional,
}

impl SchemaKind {
    /// Roles that must be mapped before an import can start.
    pub fn required_roles(self) -> &'static [ColumnRole] {
        match self {
            SchemaKind::Transactional => &[
                ColumnRole::Date,
                ColumnRole::GrossValue,
                ColumnRole::NetValue,
            ],
            SchemaKind::DailyAggregated => &[
                ColumnRole::Year,
                ColumnRole::Month,
                ColumnRole::Day,
                ColumnRole::GrossValue,
                ColumnRole::NetValue,
            ],
        }
    }
}

/// Logical meaning of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    Date,
    GrossValue,
    NetValue,
    Year,
    Month,
    Day,
    Quantity,
}

impl ColumnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::GrossValue => "grossValue",
            ColumnRole::NetValue => "netValue",
            ColumnRole::Year => "year",
            ColumnRole::Month => "month",
            ColumnRole::Day => "day",
            ColumnRole::Quantity => "quantity",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role → header label assignment for one import.
///
/// Built either from [`crate::processing::SchemaDetection::mapping`] or by hand; a hand-built
/// mapping is always honored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub schema: SchemaKind,
    pub columns: BTreeMap<ColumnRole, String>,
}

impl ColumnMapping {
    /// Empty mapping for a schema.
    pub fn new(schema: SchemaKind) -> Self {
        Self {
            schema,
            columns: BTreeMap::new(),
        }
    }

    /// Builder-style assignment; replaces any previous label for `role`.
    pub fn with(mut self, role: ColumnRole, label: impl Into<String>) -> Self {
        self.set(role, label);
        self
    }

    pub fn set(&mut self, role: ColumnRole, label: impl Into<String>) {
        self.columns.insert(role, label.into());
    }

    pub fn unset(&mut self, role: ColumnRole) {
        self.columns.remove(&role);
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.columns.get(&role).map(|s| s.as_str())
    }

    /// Resolve labels to column indexes against `headers`.
    ///
    /// A label that names no header counts as unmapped. Fails with
    /// [`ImportError::IncompleteMapping`] when a required role is left unmapped.
    pub fn resolve(&self, headers: &[String]) -> ImportResult<ResolvedMapping> {
        let mut indexes = BTreeMap::new();
        for (role, label) in &self.columns {
            let wanted = label.trim();
            if wanted.is_empty() {
                continue;
            }
            if let Some(idx) = headers.iter().position(|h| h.trim() == wanted) {
                indexes.insert(*role, idx);
            }
        }

        let missing: Vec<ColumnRole> = self
            .schema
            .required_roles()
            .iter()
            .copied()
            .filter(|r| !indexes.contains_key(r))
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::IncompleteMapping { missing });
        }

        Ok(ResolvedMapping {
            schema: self.schema,
            indexes,
            labels: self.columns.clone(),
        })
    }
}

/// A [`ColumnMapping`] checked against a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub schema: SchemaKind,
    indexes: BTreeMap<ColumnRole, usize>,
    labels: BTreeMap<ColumnRole, String>,
}

impl ResolvedMapping {
    /// Column index for `role`, if mapped.
    pub fn index(&self, role: ColumnRole) -> Option<usize> {
        self.indexes.get(&role).copied()
    }

    /// Cell text for `role` in `row`; `""` when unmapped or missing.
    pub fn cell<'a>(&self, row: &'a [String], role: ColumnRole) -> &'a str {
        self.index(role).map(|idx| cell(row, idx)).unwrap_or("")
    }

    /// Header label for `role`, falling back to the role name.
    pub fn label(&self, role: ColumnRole) -> &str {
        self.labels
            .get(&role)
            .map(|s| s.as_str())
            .unwrap_or(role.as_str())
    }
}

/// Where a sale record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleSource {
    /// Imported from a spreadsheet.
    PushinPay,
    /// Entered by hand.
    Manual,
}

/// One individual sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// ISO-8601 timestamp (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
    pub date: String,
    pub gross_value: f64,
    pub net_value: f64,
    pub source: SaleSource,
}

impl Sale {
    /// Parsed timestamp; `None` when `date` is not RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A non-fatal problem with one row. The row was skipped; the batch went on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseDiagnostic {
    /// Index of the row in the [`RawTable`] (header = 0).
    pub row_index: usize,
    pub message: String,
}

impl ParseDiagnostic {
    pub fn new(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row_index, self.message)
    }
}
