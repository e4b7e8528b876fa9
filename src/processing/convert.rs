//! Batch conversion of a daily-aggregated sheet into the transactional PushinPay layout.
//!
//! The converter targets one fixed export format, so it locates columns with its own, stricter
//! rule table ([`CONVERTER_RULES`]) instead of the interactive import rules in
//! [`super::detect`].

use tracing::{debug, warn};

use crate::error::{ImportError, ImportResult};
use crate::parsing::{
    date::DateParts, format_br_date, format_decimal_comma, int_prefix, parse_monetary_with,
};
use crate::types::{cell, is_blank_row, is_total_row, ColumnRole, ParseDiagnostic, RawTable};

use super::detect::{match_independently, KeywordRule, RoleMatch};
use super::expand::{split_total, NormalizeOptions, MAX_UNITS_PER_ROW};

/// Column rules for the converter. Every role is required; the first matching header wins.
pub const CONVERTER_RULES: [KeywordRule; 6] = [
    KeywordRule::any(ColumnRole::Year, &["ano"]),
    KeywordRule::any(ColumnRole::Month, &["mês", "mes"]),
    KeywordRule::any(ColumnRole::Day, &["dia"]),
    KeywordRule {
        role: ColumnRole::Quantity,
        any_of: &[],
        all_of: &["vendas"],
        none_of: &["valor"],
    },
    KeywordRule {
        role: ColumnRole::GrossValue,
        any_of: &[],
        all_of: &["valor", "vendas"],
        none_of: &[],
    },
    KeywordRule {
        role: ColumnRole::NetValue,
        any_of: &[],
        all_of: &["total", "recebido"],
        none_of: &[],
    },
];

/// Header of the transactional (PushinPay) sheet.
pub const PUSHINPAY_HEADER: [&str; 9] = [
    "Data",
    "Quantidade",
    "Nome do Produto",
    "Valor Unitário",
    "Total Recebido",
    "Meio de Pagamento",
    "Status",
    "Observações",
    "Identificação",
];

/// Product name written on every converted row.
pub const GENERIC_PRODUCT: &str = "Produto Genérico";

/// Output of [`convert_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Transactional sheet, header included.
    pub table: RawTable,
    /// One entry per input row rejected by validation.
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Input data rows that produced no output (silently skipped rows included).
    pub skipped_rows: usize,
}

/// Convert a daily-aggregated sheet into the transactional PushinPay sheet.
///
/// See [`convert_with`] for the rules; this uses default options and drops the diagnostics
/// (they are still logged).
pub fn convert_aggregated_to_transactional(table: &RawTable) -> ImportResult<RawTable> {
    convert_with(table, &NormalizeOptions::default()).map(|c| c.table)
}

/// Convert a daily-aggregated sheet, keeping per-row diagnostics.
///
/// Fails with [`ImportError::SchemaMismatch`] when a required column cannot be located and with
/// [`ImportError::NoValidRows`] when no row survives validation. Rows with a blank first cell
/// or a `Total` first cell are skipped silently; rows with missing date parts, a non-positive
/// quantity, a non-positive gross value or an impossible date are skipped with a diagnostic.
pub fn convert_with(table: &RawTable, options: &NormalizeOptions) -> ImportResult<Conversion> {
    if table.rows.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: "empty or invalid sheet".to_string(),
        });
    }
    let columns = locate_columns(table.headers())?;

    let mut out = Conversion {
        table: RawTable::new(vec![PUSHINPAY_HEADER.iter().map(|h| h.to_string()).collect()]),
        ..Default::default()
    };

    for (row_index, row) in table.data_rows() {
        if is_blank_row(row) || is_total_row(row) || cell(row, 0).trim().is_empty() {
            out.skipped_rows += 1;
            continue;
        }

        match convert_row(row, &columns, options) {
            Ok(mut rows) => out.table.rows.append(&mut rows),
            Err(reason) => {
                warn!(row = row_index, reason = %reason, "aggregated row ignored");
                out.diagnostics.push(ParseDiagnostic::new(row_index, reason));
                out.skipped_rows += 1;
            }
        }
    }

    if out.table.data_row_count() == 0 {
        return Err(ImportError::NoValidRows {
            skipped: out.skipped_rows,
        });
    }
    debug!(
        input_rows = table.data_row_count(),
        output_rows = out.table.data_row_count(),
        "aggregated sheet converted"
    );
    Ok(out)
}

struct ConverterColumns {
    year: usize,
    month: usize,
    day: usize,
    quantity: usize,
    gross: usize,
    net: usize,
}

fn locate_columns(headers: &[String]) -> ImportResult<ConverterColumns> {
    let mut found = [0usize; 6];
    let mut missing = Vec::new();
    for (slot, rule) in found.iter_mut().zip(CONVERTER_RULES.iter()) {
        let label = match match_independently(headers, rule) {
            RoleMatch::Found(label) => Some(label),
            RoleMatch::Ambiguous(labels) => labels.into_iter().next(),
            RoleMatch::Absent => None,
        };
        match label.and_then(|l| headers.iter().position(|h| *h == l)) {
            Some(idx) => *slot = idx,
            None => missing.push(rule.role),
        }
    }

    if !missing.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: format!(
                "invalid sheet layout (missing {}). required columns: Ano, Mês, Dia, Vendas, Valor Vendas, Total Recebido",
                missing.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let [year, month, day, quantity, gross, net] = found;
    Ok(ConverterColumns {
        year,
        month,
        day,
        quantity,
        gross,
        net,
    })
}

fn convert_row(
    row: &[String],
    columns: &ConverterColumns,
    options: &NormalizeOptions,
) -> Result<Vec<Vec<String>>, String> {
    let parts = DateParts::new(
        cell(row, columns.year),
        cell(row, columns.month),
        cell(row, columns.day),
    );
    if [parts.year, parts.month, parts.day]
        .iter()
        .any(|p| p.trim().is_empty())
    {
        return Err("missing year, month or day".to_string());
    }

    let quantity = int_prefix(cell(row, columns.quantity))
        .filter(|q| *q > 0)
        .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
        .ok_or_else(|| format!("invalid quantity '{}'", cell(row, columns.quantity)))?;
    if quantity > MAX_UNITS_PER_ROW {
        return Err(format!("quantity exceeds {MAX_UNITS_PER_ROW}"));
    }

    let gross = parse_monetary_with(cell(row, columns.gross), options.parse_mode)
        .map_err(|e| e.to_string())?;
    if gross <= 0.0 {
        return Err(format!(
            "gross value must be positive (raw='{}')",
            cell(row, columns.gross)
        ));
    }
    let net = parse_monetary_with(cell(row, columns.net), options.parse_mode)
        .map_err(|e| e.to_string())?;

    let date = parts
        .to_date()
        .map(format_br_date)
        .ok_or_else(|| format!("invalid date {}/{}/{}", parts.day, parts.month, parts.year))?;

    let grosses = split_total(gross, quantity, options.split_policy);
    let nets = split_total(net, quantity, options.split_policy);

    Ok(grosses
        .into_iter()
        .zip(nets)
        .enumerate()
        .map(|(i, (unit_gross, unit_net))| {
            vec![
                date.clone(),
                "1".to_string(),
                GENERIC_PRODUCT.to_string(),
                format_decimal_comma(unit_gross),
                format_decimal_comma(unit_net),
                String::new(),
                String::new(),
                String::new(),
                format!("Venda {} de {quantity} do dia {date}", i + 1),
            ]
        })
        .collect())
}
