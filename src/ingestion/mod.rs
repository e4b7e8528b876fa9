//! Sheet readers and the unified import entrypoint.
//!
//! Most callers should use [`import_from_path`] (from [`unified`]) which:
//!
//! - auto-detects the format by file extension (or you can override via [`ImportOptions`])
//! - reads the first sheet (or a named one) into a [`crate::types::RawTable`]
//! - detects or applies a column mapping and produces sales
//! - optionally reports success/failure/alerts to an [`ImportObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats,
    TracingObserver,
};
pub use unified::{
    import_from_path, read_table_from_path, severity_for_error, ExcelSheetSelection, ImportOptions,
    ImportRequest, InputFormat,
};
