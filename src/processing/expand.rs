//! Expansion of daily-aggregated rows into individual sales.

use crate::error::ParseFailure;
use crate::ids::IdGenerator;
use crate::parsing::{date::DateParts, int_prefix, parse_date, parse_monetary_with, ParseMode};
use crate::types::{is_blank_row, is_total_row, ColumnRole, ResolvedMapping, Sale, SaleSource, SchemaKind};

/// Upper bound on sales produced from a single aggregated row.
pub const MAX_UNITS_PER_ROW: u32 = 100_000;

/// How a row total is divided across its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// `total / quantity` for every unit, no rounding. Units may not sum back to the exact total
    /// under floating point.
    #[default]
    Even,
    /// Whole cents per unit; leftover cents go to the first units so the units sum to the total
    /// rounded to cents.
    ReconcileCents,
}

/// Per-row parsing options shared by the orchestrator, the expander and the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    pub parse_mode: ParseMode,
    pub split_policy: SplitPolicy,
}

/// Divide `total` into `quantity` unit values.
pub fn split_total(total: f64, quantity: u32, policy: SplitPolicy) -> Vec<f64> {
    if quantity == 0 {
        return Vec::new();
    }
    match policy {
        SplitPolicy::Even => vec![total / f64::from(quantity); quantity as usize],
        SplitPolicy::ReconcileCents => {
            let cents = (total * 100.0).round() as i64;
            let q = i64::from(quantity);
            let (base, extra) = (cents.div_euclid(q), cents.rem_euclid(q));
            (0..q)
                .map(|i| {
                    let unit = if i < extra { base + 1 } else { base };
                    unit as f64 / 100.0
                })
                .collect()
        }
    }
}

/// Quantity of an aggregated row.
///
/// `None` when no quantity column is mapped. A mapped but blank, unparsable or non-positive
/// cell counts as `1`; a count too large for `u32` saturates, so the caller's cap rejects it.
pub fn row_quantity(row: &[String], resolved: &ResolvedMapping) -> Option<u32> {
    resolved.index(ColumnRole::Quantity)?;
    let q = int_prefix(resolved.cell(row, ColumnRole::Quantity))
        .filter(|q| *q >= 1)
        .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
        .unwrap_or(1);
    Some(q)
}

/// Date, gross and net of a row, parsed per `mode`.
pub(crate) struct RowValues {
    pub date: String,
    pub gross: f64,
    pub net: f64,
}

pub(crate) fn read_row_values(
    row: &[String],
    resolved: &ResolvedMapping,
    mode: ParseMode,
) -> Result<RowValues, ParseFailure> {
    let date_text = resolved.cell(row, ColumnRole::Date);
    let parts = match resolved.schema {
        SchemaKind::DailyAggregated => Some(DateParts::new(
            resolved.cell(row, ColumnRole::Year),
            resolved.cell(row, ColumnRole::Month),
            resolved.cell(row, ColumnRole::Day),
        )),
        SchemaKind::Transactional => None,
    };
    let date = parse_date(date_text, parts, mode)
        .map_err(|e| e.in_column(resolved.label(ColumnRole::Date)))?;

    let gross = parse_monetary_with(resolved.cell(row, ColumnRole::GrossValue), mode)
        .map_err(|e| e.in_column(resolved.label(ColumnRole::GrossValue)))?;
    let net = parse_monetary_with(resolved.cell(row, ColumnRole::NetValue), mode)
        .map_err(|e| e.in_column(resolved.label(ColumnRole::NetValue)))?;

    for (role, value) in [(ColumnRole::GrossValue, gross), (ColumnRole::NetValue, net)] {
        if value < 0.0 {
            return Err(ParseFailure::new(
                resolved.label(role),
                resolved.cell(row, role),
                "negative value",
            ));
        }
    }

    Ok(RowValues { date, gross, net })
}

/// Turn one daily-aggregated row into `quantity` individual sales.
///
/// Each sale carries the row date and `total / quantity` of the gross and net totals (see
/// [`SplitPolicy`]). Blank rows and `Total` rows produce nothing. Without a quantity column the
/// row counts as a single sale, and a row whose totals are both zero produces nothing.
pub fn expand_aggregated_row(
    row: &[String],
    resolved: &ResolvedMapping,
    options: &NormalizeOptions,
    ids: &dyn IdGenerator,
) -> Result<Vec<Sale>, ParseFailure> {
    if is_blank_row(row) || is_total_row(row) {
        return Ok(Vec::new());
    }

    let values = read_row_values(row, resolved, options.parse_mode)?;

    let quantity = match row_quantity(row, resolved) {
        Some(q) if q > MAX_UNITS_PER_ROW => {
            return Err(ParseFailure::new(
                resolved.label(ColumnRole::Quantity),
                resolved.cell(row, ColumnRole::Quantity),
                format!("quantity exceeds {MAX_UNITS_PER_ROW}"),
            ));
        }
        Some(q) => q,
        None if values.gross == 0.0 && values.net == 0.0 => return Ok(Vec::new()),
        None => 1,
    };

    let grosses = split_total(values.gross, quantity, options.split_policy);
    let nets = split_total(values.net, quantity, options.split_policy);

    Ok(grosses
        .into_iter()
        .zip(nets)
        .map(|(gross_value, net_value)| Sale {
            id: ids.next_id(),
            date: values.date.clone(),
            gross_value,
            net_value,
            source: SaleSource::PushinPay,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use crate::types::{ColumnMapping, RawTable};

    fn aggregated_table() -> RawTable {
        RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
            &["2024", "Janeiro", "1", "2", "29,80", "28,31"],
            &["2024", "Janeiro", "3", "3", "44,70", "42,47"],
            &["Total", "", "", "6", "89,40", "84,94"],
        ])
    }

    fn aggregated_mapping() -> ColumnMapping {
        ColumnMapping::new(SchemaKind::DailyAggregated)
            .with(ColumnRole::Year, "Ano")
            .with(ColumnRole::Month, "Mês")
            .with(ColumnRole::Day, "Dia")
            .with(ColumnRole::Quantity, "Vendas")
            .with(ColumnRole::GrossValue, "Valor Vendas")
            .with(ColumnRole::NetValue, "Total Recebido")
    }

    fn resolved(table: &RawTable) -> ResolvedMapping {
        aggregated_mapping().resolve(table.headers()).unwrap()
    }

    #[test]
    fn expands_quantity_into_equal_sales() {
        let table = aggregated_table();
        let ids = SequentialIdGenerator::new("s");
        let sales =
            expand_aggregated_row(&table.rows[1], &resolved(&table), &NormalizeOptions::default(), &ids)
                .unwrap();

        assert_eq!(sales.len(), 2);
        for sale in &sales {
            assert!((sale.gross_value - 14.90).abs() < 1e-9);
            assert!((sale.net_value - 14.155).abs() < 1e-9);
            assert_eq!(sale.date, "2024-01-01T00:00:00.000Z");
            assert_eq!(sale.source, SaleSource::PushinPay);
        }
        assert_eq!(sales[0].id, "s-1");
        assert_eq!(sales[1].id, "s-2");
    }

    #[test]
    fn units_sum_back_to_row_total() {
        let table = aggregated_table();
        let ids = SequentialIdGenerator::default();
        let sales =
            expand_aggregated_row(&table.rows[2], &resolved(&table), &NormalizeOptions::default(), &ids)
                .unwrap();

        let gross: f64 = sales.iter().map(|s| s.gross_value).sum();
        let net: f64 = sales.iter().map(|s| s.net_value).sum();
        assert_eq!(sales.len(), 3);
        assert!((gross - 44.70).abs() < 1e-9);
        assert!((net - 42.47).abs() < 1e-9);
    }

    #[test]
    fn total_and_blank_rows_expand_to_nothing() {
        let table = aggregated_table();
        let r = resolved(&table);
        let ids = SequentialIdGenerator::default();
        let opts = NormalizeOptions::default();

        assert!(expand_aggregated_row(&table.rows[3], &r, &opts, &ids).unwrap().is_empty());
        let blank = vec![String::new(), " ".to_string()];
        assert!(expand_aggregated_row(&blank, &r, &opts, &ids).unwrap().is_empty());
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let table = RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
            &["2024", "Fevereiro", "2", "abc", "10,00", "9,50"],
            &["2024", "Fevereiro", "3", "-2", "10,00", "9,50"],
        ]);
        let r = resolved(&table);
        assert_eq!(row_quantity(&table.rows[1], &r), Some(1));
        assert_eq!(row_quantity(&table.rows[2], &r), Some(1));

        let mut no_qty = aggregated_mapping();
        no_qty.unset(ColumnRole::Quantity);
        let r = no_qty.resolve(table.headers()).unwrap();
        assert_eq!(row_quantity(&table.rows[1], &r), None);
    }

    #[test]
    fn zero_totals_without_quantity_column_are_skipped() {
        let table = RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Valor Vendas", "Total Recebido"],
            &["2024", "Março", "5", "0", ""],
            &["2024", "Março", "6", "5,00", "4,75"],
        ]);
        let mut mapping = aggregated_mapping();
        mapping.unset(ColumnRole::Quantity);
        let r = mapping.resolve(table.headers()).unwrap();
        let ids = SequentialIdGenerator::default();
        let opts = NormalizeOptions::default();

        assert!(expand_aggregated_row(&table.rows[1], &r, &opts, &ids).unwrap().is_empty());
        let sales = expand_aggregated_row(&table.rows[2], &r, &opts, &ids).unwrap();
        assert_eq!(sales.len(), 1);
        assert!((sales[0].net_value - 4.75).abs() < 1e-9);
    }

    #[test]
    fn bad_date_components_are_a_row_failure() {
        let table = RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
            &["2024", "Fevereiro", "31", "1", "10,00", "9,50"],
        ]);
        let err = expand_aggregated_row(
            &table.rows[1],
            &resolved(&table),
            &NormalizeOptions::default(),
            &SequentialIdGenerator::default(),
        )
        .unwrap_err();
        assert_eq!(err.message, "invalid date components");
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        let table = RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
            &["2024", "Abril", "1", "100001", "10,00", "9,50"],
        ]);
        let err = expand_aggregated_row(
            &table.rows[1],
            &resolved(&table),
            &NormalizeOptions::default(),
            &SequentialIdGenerator::default(),
        )
        .unwrap_err();
        assert_eq!(err.column, "Vendas");
    }

    #[test]
    fn quantity_beyond_u32_hits_the_cap() {
        let table = RawTable::from_strs(&[
            &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
            &["2024", "Janeiro", "1", "5000000000", "10,00", "9,50"],
            &["2024", "Janeiro", "2", "99999999999999999999", "10,00", "9,50"],
        ]);
        let r = resolved(&table);
        let ids = SequentialIdGenerator::default();
        let opts = NormalizeOptions::default();

        assert_eq!(row_quantity(&table.rows[1], &r), Some(u32::MAX));
        for row in &table.rows[1..] {
            let err = expand_aggregated_row(row, &r, &opts, &ids).unwrap_err();
            assert_eq!(err.message, format!("quantity exceeds {MAX_UNITS_PER_ROW}"));
        }
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn reconcile_cents_gives_leftover_to_first_units() {
        assert_eq!(
            split_total(28.31, 2, SplitPolicy::ReconcileCents),
            vec![14.16, 14.15]
        );
        assert_eq!(
            split_total(42.47, 3, SplitPolicy::ReconcileCents),
            vec![14.16, 14.16, 14.15]
        );
        assert_eq!(split_total(10.0, 0, SplitPolicy::Even), Vec::<f64>::new());
    }
}
