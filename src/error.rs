use thiserror::Error;

use crate::types::ColumnRole;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by import, conversion and ledger functions.
///
/// Variants here abort the whole operation. Row-level problems never surface as an
/// `ImportError` from the orchestrator; they are collected as
/// [`crate::types::ParseDiagnostic`]s instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook reading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "excel_writer")]
    /// Workbook writing error (feature-gated behind `excel_writer`).
    #[error("xlsx writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input shape is not usable (unrecognized headers, unknown format, empty sheet).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// One or more required column roles are not mapped to a header.
    #[error("incomplete column mapping: missing {}", fmt_roles(.missing))]
    IncompleteMapping { missing: Vec<ColumnRole> },

    /// Conversion finished without producing a single valid output row.
    #[error("no valid rows were produced ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },

    /// A persisted document could not be encoded or decoded.
    #[error("store error: {message}")]
    Store { message: String },
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Store {
            message: err.to_string(),
        }
    }
}

fn fmt_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single cell that could not be turned into a value.
///
/// Produced by the parsers in strict mode (and for invalid date components in any mode). The
/// orchestrator turns it into a row diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse column '{column}': {message} (raw='{raw}')")]
pub struct ParseFailure {
    pub column: String,
    pub raw: String,
    pub message: String,
}

impl ParseFailure {
    pub fn new(column: impl Into<String>, raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Replace the column label, keeping raw text and message.
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}
