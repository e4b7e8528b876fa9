//! Import orchestration: [`RawTable`] + [`ColumnMapping`] → [`Sale`]s and diagnostics.

use tracing::{debug, warn};

use crate::error::{ImportError, ImportResult, ParseFailure};
use crate::ids::IdGenerator;
use crate::types::{
    is_blank_row, is_total_row, ColumnMapping, ParseDiagnostic, RawTable, ResolvedMapping, Sale,
    SaleSource, SchemaKind,
};

use super::detect::detect_schema;
use super::expand::{expand_aggregated_row, read_row_values, NormalizeOptions};

/// Result of importing one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    /// Sales in row order (expanded rows keep their units together).
    pub sales: Vec<Sale>,
    /// One entry per malformed row.
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Data rows that produced no sale (blank, `Total`, zero-valued or malformed).
    pub skipped_rows: usize,
}

impl ImportOutcome {
    pub fn imported(&self) -> usize {
        self.sales.len()
    }

    /// Short human-readable result line.
    pub fn summary(&self) -> String {
        let imported = |n: usize| match n {
            1 => "1 sale imported".to_string(),
            n => format!("{n} sales imported"),
        };
        match (self.sales.len(), self.diagnostics.len()) {
            (0, _) => "no valid sales found".to_string(),
            (n, 0) => imported(n),
            (n, 1) => format!("{}, 1 row with problems skipped", imported(n)),
            (n, d) => format!("{}, {d} rows with problems skipped", imported(n)),
        }
    }
}

/// Import every data row of `table` using `mapping`.
///
/// The mapping is checked against the header before any row is read; an unmapped required role
/// fails the whole import with [`ImportError::IncompleteMapping`]. After that, per-row problems
/// never abort the batch: the row is skipped and reported in
/// [`ImportOutcome::diagnostics`].
///
/// Row rules:
///
/// - blank rows and `Total` rows are skipped without a diagnostic
/// - daily-aggregated rows go through [`expand_aggregated_row`]
/// - transactional rows produce one sale when gross or net is positive
pub fn import_rows(
    table: &RawTable,
    mapping: &ColumnMapping,
    options: &NormalizeOptions,
    ids: &dyn IdGenerator,
) -> ImportResult<ImportOutcome> {
    if table.rows.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: "table has no header row".to_string(),
        });
    }
    let resolved = mapping.resolve(table.headers())?;
    debug!(
        schema = ?resolved.schema,
        rows = table.data_row_count(),
        "importing rows"
    );

    let mut outcome = ImportOutcome::default();
    for (row_index, row) in table.data_rows() {
        if is_blank_row(row) || is_total_row(row) {
            outcome.skipped_rows += 1;
            continue;
        }

        let result = match resolved.schema {
            SchemaKind::DailyAggregated => expand_aggregated_row(row, &resolved, options, ids),
            SchemaKind::Transactional => transactional_row(row, &resolved, options, ids),
        };

        match result {
            Ok(sales) if sales.is_empty() => outcome.skipped_rows += 1,
            Ok(sales) => outcome.sales.extend(sales),
            Err(failure) => {
                warn!(row = row_index, error = %failure, "row skipped");
                outcome
                    .diagnostics
                    .push(ParseDiagnostic::new(row_index, failure.to_string()));
                outcome.skipped_rows += 1;
            }
        }
    }

    debug!(
        sales = outcome.sales.len(),
        skipped = outcome.skipped_rows,
        diagnostics = outcome.diagnostics.len(),
        "import finished"
    );
    Ok(outcome)
}

/// Detect the schema from the header and import with the detected mapping.
///
/// Ambiguous or absent required roles make this fail with
/// [`ImportError::IncompleteMapping`]; use [`detect_schema`] and [`import_rows`] to fill them in.
pub fn import_detected(
    table: &RawTable,
    options: &NormalizeOptions,
    ids: &dyn IdGenerator,
) -> ImportResult<ImportOutcome> {
    let mapping = detect_schema(table.headers()).mapping();
    import_rows(table, &mapping, options, ids)
}

fn transactional_row(
    row: &[String],
    resolved: &ResolvedMapping,
    options: &NormalizeOptions,
    ids: &dyn IdGenerator,
) -> Result<Vec<Sale>, ParseFailure> {
    let values = read_row_values(row, resolved, options.parse_mode)?;
    if values.gross <= 0.0 && values.net <= 0.0 {
        return Ok(Vec::new());
    }
    Ok(vec![Sale {
        id: ids.next_id(),
        date: values.date,
        gross_value: values.gross,
        net_value: values.net,
        source: SaleSource::PushinPay,
    }])
}
