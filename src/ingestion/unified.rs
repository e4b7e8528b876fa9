//! Unified import entrypoint.
//!
//! Most callers should use [`import_from_path`], which reads a CSV or workbook file, detects
//! the column mapping when none is given and turns the rows into sales.
//!
//! - If [`ImportOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::ImportObserver`] is provided, success/failure/alerts and
//!   skipped rows are reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::processing::{detect_schema, import_rows, ImportOutcome, NormalizeOptions};
use crate::types::{ColumnMapping, RawTable};

use super::csv;
use super::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Which sheet to read from a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Sheet(String),
}

/// Options controlling [`import_from_path`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<InputFormat>,
    /// Sheet to read from workbooks.
    pub excel_sheet: ExcelSheetSelection,
    /// Parser strictness and split policy.
    pub normalize: NormalizeOptions,
    /// Source of sale ids.
    pub id_generator: Arc<dyn IdGenerator>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("format", &self.format)
            .field("excel_sheet", &self.excel_sheet)
            .field("normalize", &self.normalize)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet: ExcelSheetSelection::default(),
            normalize: NormalizeOptions::default(),
            id_generator: Arc::new(UuidIdGenerator),
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Read the sheet at `path` into a [`RawTable`] without interpreting it.
///
/// Useful for previews and for building a mapping with
/// [`crate::processing::detect_schema`] before importing.
pub fn read_table_from_path(path: impl AsRef<Path>, options: &ImportOptions) -> ImportResult<RawTable> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    read_table(path, format, &options.excel_sheet)
}

/// Import sales from a CSV or workbook file.
///
/// - If `mapping` is `None`, the mapping comes from [`crate::processing::detect_schema`]; only
///   confidently detected roles are used, so an ambiguous sheet fails with
///   [`ImportError::IncompleteMapping`].
/// - Rows are processed by [`crate::processing::import_rows`].
///
/// When an observer is configured, this function reports:
///
/// - `on_diagnostic` for every skipped malformed row, then `on_success` with counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ## CSV with a detected mapping
///
/// ```no_run
/// use sales_import::ingestion::{import_from_path, ImportOptions};
///
/// # fn main() -> Result<(), sales_import::ImportError> {
/// let outcome = import_from_path("vendas.csv", None, &ImportOptions::default())?;
/// println!("{}", outcome.summary());
/// # Ok(())
/// # }
/// ```
///
/// ## Explicit mapping, strict parsing and tracing output
///
/// ```no_run
/// use std::sync::Arc;
///
/// use sales_import::ingestion::{import_from_path, ImportOptions, TracingObserver};
/// use sales_import::parsing::ParseMode;
/// use sales_import::processing::NormalizeOptions;
/// use sales_import::types::{ColumnMapping, ColumnRole, SchemaKind};
///
/// # fn main() -> Result<(), sales_import::ImportError> {
/// let mapping = ColumnMapping::new(SchemaKind::Transactional)
///     .with(ColumnRole::Date, "Data")
///     .with(ColumnRole::GrossValue, "Valor Unitário")
///     .with(ColumnRole::NetValue, "Total Recebido");
///
/// let opts = ImportOptions {
///     normalize: NormalizeOptions {
///         parse_mode: ParseMode::Strict,
///         ..Default::default()
///     },
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
///
/// let outcome = import_from_path("pushinpay.xlsx", Some(&mapping), &opts)?;
/// for d in &outcome.diagnostics {
///     eprintln!("{d}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn import_from_path(
    path: impl AsRef<Path>,
    mapping: Option<&ColumnMapping>,
    options: &ImportOptions,
) -> ImportResult<ImportOutcome> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = ImportContext {
        path: path.to_path_buf(),
        format,
    };

    let result = read_table(path, format, &options.excel_sheet).and_then(|table| {
        let mapping = match mapping {
            Some(m) => m.clone(),
            None => detect_schema(table.headers()).mapping(),
        };
        let outcome = import_rows(
            &table,
            &mapping,
            &options.normalize,
            options.id_generator.as_ref(),
        )?;
        let stats = ImportStats {
            schema: mapping.schema,
            rows_read: table.data_row_count(),
            sales: outcome.sales.len(),
            skipped_rows: outcome.skipped_rows,
            diagnostics: outcome.diagnostics.len(),
        };
        Ok((outcome, stats))
    });

    match result {
        Ok((outcome, stats)) => {
            tracing::info!(
                path = %path.display(),
                sales = stats.sales,
                skipped = stats.skipped_rows,
                "file imported"
            );
            if let Some(obs) = options.observer.as_ref() {
                for d in &outcome.diagnostics {
                    obs.on_diagnostic(&ctx, d);
                }
                obs.on_success(&ctx, stats);
            }
            Ok(outcome)
        }
        Err(e) => {
            if let Some(obs) = options.observer.as_ref() {
                let sev = severity_for_error(&e);
                obs.on_failure(&ctx, sev, &e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, &e);
                }
            }
            Err(e)
        }
    }
}

/// Severity used for observer callbacks when an import fails.
pub fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        #[cfg(feature = "excel")]
        ImportError::Excel(calamine::Error::Io(_)) => ImportSeverity::Critical,
        #[cfg(feature = "excel")]
        ImportError::Excel(_) => ImportSeverity::Error,
        #[cfg(feature = "excel_writer")]
        ImportError::Xlsx(_) => ImportSeverity::Error,
        ImportError::SchemaMismatch { .. }
        | ImportError::IncompleteMapping { .. }
        | ImportError::NoValidRows { .. } => ImportSeverity::Error,
        ImportError::Store { .. } => ImportSeverity::Critical,
    }
}

fn infer_format_from_path(path: &Path) -> ImportResult<InputFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ImportError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    InputFormat::from_extension(ext).ok_or_else(|| ImportError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn read_table(path: &Path, format: InputFormat, sheet: &ExcelSheetSelection) -> ImportResult<RawTable> {
    match format {
        InputFormat::Csv => csv::read_csv_table_from_path(path),
        InputFormat::Excel => read_excel_dispatch(path, sheet),
    }
}

fn read_excel_dispatch(path: &Path, sel: &ExcelSheetSelection) -> ImportResult<RawTable> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::read_excel_table_from_path(path, None),
            ExcelSheetSelection::Sheet(name) => {
                excel::read_excel_table_from_path(path, Some(name.as_str()))
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ImportError::SchemaMismatch {
            message: "excel import not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// Owned import request, e.g. for handing work to another thread.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub path: PathBuf,
    /// `None` means detect from the header.
    pub mapping: Option<ColumnMapping>,
    pub options: ImportOptions,
}

impl ImportRequest {
    /// Execute the request by calling [`import_from_path`].
    pub fn run(&self) -> ImportResult<ImportOutcome> {
        import_from_path(&self.path, self.mapping.as_ref(), &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_come_from_extensions() {
        assert_eq!(InputFormat::from_extension("CSV"), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_extension("ods"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("json"), None);
        assert!(infer_format_from_path(Path::new("vendas")).is_err());
    }

    #[test]
    fn io_failures_are_critical() {
        let err = ImportError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "nope"));
        assert_eq!(severity_for_error(&err), ImportSeverity::Critical);
        let err = ImportError::IncompleteMapping { missing: vec![] };
        assert_eq!(severity_for_error(&err), ImportSeverity::Error);
    }
}
