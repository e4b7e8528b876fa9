//! Turning sheet rows into sales.
//!
//! - [`detect`]: header keyword rules and schema detection
//! - [`expand`]: daily-aggregate expansion into unit sales
//! - [`import`]: the row orchestrator ([`import_rows`])
//! - [`convert`]: batch conversion of aggregated sheets to the transactional layout
//!
//! ## Example: detect, fix up the mapping, import
//!
//! ```rust
//! use sales_import::ids::SequentialIdGenerator;
//! use sales_import::processing::{detect_schema, import_rows, NormalizeOptions, RoleMatch};
//! use sales_import::templates::daily_sales_example;
//! use sales_import::types::{ColumnRole, SchemaKind};
//!
//! let table = daily_sales_example();
//! let detection = detect_schema(table.headers());
//! assert_eq!(detection.schema, SchemaKind::DailyAggregated);
//! assert!(matches!(detection.role(ColumnRole::GrossValue), RoleMatch::Ambiguous(_)));
//!
//! // "Valor Vendas" and "Total Recebido" both look like gross values; pick them by hand.
//! let mapping = detection
//!     .mapping()
//!     .with(ColumnRole::GrossValue, "Valor Vendas")
//!     .with(ColumnRole::NetValue, "Total Recebido");
//!
//! let outcome = import_rows(
//!     &table,
//!     &mapping,
//!     &NormalizeOptions::default(),
//!     &SequentialIdGenerator::default(),
//! )
//! .unwrap();
//! assert_eq!(outcome.sales.len(), 9);
//! assert!(outcome.diagnostics.is_empty());
//! ```

pub mod convert;
pub mod detect;
pub mod expand;
pub mod import;

pub use convert::{
    convert_aggregated_to_transactional, convert_with, Conversion, CONVERTER_RULES,
    GENERIC_PRODUCT, PUSHINPAY_HEADER,
};
pub use detect::{
    detect_schema, detect_schema_kind, KeywordRule, RoleMatch, SchemaDetection, DATE_PART_RULES,
    IMPORT_RULES,
};
pub use expand::{
    expand_aggregated_row, row_quantity, split_total, NormalizeOptions, SplitPolicy,
    MAX_UNITS_PER_ROW,
};
pub use import::{import_detected, import_rows, ImportOutcome};
