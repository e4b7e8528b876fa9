//! `sales-import` reads sales spreadsheets exported by a small online business (Brazilian
//! locale) into individual [`types::Sale`] records for a finance dashboard.
//!
//! The primary entrypoint is [`ingestion::import_from_path`], which reads a CSV or workbook,
//! detects the column mapping from the header row and returns an
//! [`processing::ImportOutcome`] with the sales and a diagnostic for every skipped row.
//!
//! ## What you can import
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//!
//! **Sheet layouts:**
//!
//! - [`types::SchemaKind::Transactional`]: one row per sale (date, gross value, net value)
//! - [`types::SchemaKind::DailyAggregated`]: one row per day (year, month name, day, number of
//!   sales, gross and net totals). Each row is expanded into one sale per unit.
//!
//! Cells use Brazilian notation: `1.234,56`, `R$ 29,80`, `15/03/2024`, `Janeiro`. See
//! [`parsing`] for the accepted forms and the lenient/strict fallbacks.
//!
//! ## Quick example
//!
//! ```no_run
//! use sales_import::ingestion::{import_from_path, ImportOptions};
//!
//! # fn main() -> Result<(), sales_import::ImportError> {
//! let outcome = import_from_path("vendas.csv", None, &ImportOptions::default())?;
//! println!("{}", outcome.summary());
//! # Ok(())
//! # }
//! ```
//!
//! Tables already in memory go straight to the orchestrator:
//!
//! ```rust
//! use sales_import::ids::SequentialIdGenerator;
//! use sales_import::processing::{import_rows, NormalizeOptions};
//! use sales_import::types::{ColumnMapping, ColumnRole, RawTable, SchemaKind};
//!
//! let table = RawTable::from_strs(&[
//!     &["Data", "Valor Bruto", "Valor Líquido"],
//!     &["15/03/2024", "R$ 1.234,56", "1.100,00"],
//!     &["Total", "1.234,56", "1.100,00"],
//! ]);
//! let mapping = ColumnMapping::new(SchemaKind::Transactional)
//!     .with(ColumnRole::Date, "Data")
//!     .with(ColumnRole::GrossValue, "Valor Bruto")
//!     .with(ColumnRole::NetValue, "Valor Líquido");
//!
//! let outcome = import_rows(
//!     &table,
//!     &mapping,
//!     &NormalizeOptions::default(),
//!     &SequentialIdGenerator::default(),
//! )
//! .unwrap();
//! assert_eq!(outcome.sales.len(), 1);
//! assert_eq!(outcome.sales[0].date, "2024-03-15T00:00:00.000Z");
//! assert_eq!(outcome.sales[0].gross_value, 1234.56);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: file readers, the unified entrypoint and import observers
//! - [`processing`]: schema detection, aggregate expansion, the row orchestrator and the
//!   aggregated → transactional converter
//! - [`parsing`]: Brazilian money and date parsers
//! - [`types`]: tables, mappings, sales and diagnostics
//! - [`ids`]: sale id generators
//! - [`templates`]: example sheets offered for download
//! - [`ledger`]: the persisted financial document, KPIs and chart data
//! - [`error`]: error types

pub mod error;
pub mod ids;
pub mod ingestion;
pub mod ledger;
pub mod parsing;
pub mod processing;
pub mod templates;
pub mod types;

pub use error::{ImportError, ImportResult, ParseFailure};
