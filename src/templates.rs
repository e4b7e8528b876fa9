//! Fixed example sheets offered to users as download templates.
//!
//! [`daily_sales_example`] shows the daily-aggregated layout and [`pushinpay_example`] the
//! transactional layout produced by the converter. With the `excel_writer` feature either table
//! can be encoded as a one-sheet `.xlsx` workbook.

use crate::types::RawTable;

/// Sheet name used for [`daily_sales_example`] workbooks.
pub const DAILY_SALES_SHEET: &str = "Vendas Diárias";
/// Sheet name used for [`pushinpay_example`] workbooks.
pub const PUSHINPAY_SHEET: &str = "PushinPay";

/// Five days of aggregated sales at R$ 14,90 per unit.
pub fn daily_sales_example() -> RawTable {
    RawTable::from_strs(&[
        &["Ano", "Mês", "Dia", "Vendas", "Valor Vendas", "Total Recebido"],
        &["2025", "Janeiro", "1", "2", "29,80", "28,31"],
        &["2025", "Janeiro", "2", "1", "14,90", "14,16"],
        &["2025", "Janeiro", "3", "3", "44,70", "42,47"],
        &["2025", "Janeiro", "4", "1", "14,90", "14,16"],
        &["2025", "Janeiro", "5", "2", "29,80", "28,31"],
    ])
}

/// The first three days of [`daily_sales_example`] in transactional form.
///
/// Net cents are distributed the way [`crate::processing::SplitPolicy::ReconcileCents`] does.
pub fn pushinpay_example() -> RawTable {
    RawTable::from_strs(&[
        &[
            "Data",
            "Quantidade",
            "Nome do Produto",
            "Valor Unitário",
            "Total Recebido",
            "Meio de Pagamento",
            "Status",
            "Observações",
            "Identificação",
        ],
        &["01/01/2025", "1", "Produto Genérico", "14,90", "14,16", "", "", "", "Venda 1 de 2 do dia 01/01/2025"],
        &["01/01/2025", "1", "Produto Genérico", "14,90", "14,15", "", "", "", "Venda 2 de 2 do dia 01/01/2025"],
        &["02/01/2025", "1", "Produto Genérico", "14,90", "14,16", "", "", "", "Venda 1 de 1 do dia 02/01/2025"],
        &["03/01/2025", "1", "Produto Genérico", "14,90", "14,16", "", "", "", "Venda 1 de 3 do dia 03/01/2025"],
        &["03/01/2025", "1", "Produto Genérico", "14,90", "14,16", "", "", "", "Venda 2 de 3 do dia 03/01/2025"],
        &["03/01/2025", "1", "Produto Genérico", "14,90", "14,15", "", "", "", "Venda 3 de 3 do dia 03/01/2025"],
    ])
}

#[cfg(feature = "excel_writer")]
mod workbook {
    use std::path::Path;

    use rust_xlsxwriter::{Workbook, Worksheet};

    use crate::error::ImportResult;
    use crate::types::RawTable;

    fn fill_sheet(sheet: &mut Worksheet, table: &RawTable, sheet_name: &str) -> ImportResult<()> {
        sheet.set_name(sheet_name)?;
        for (r, row) in (0u32..).zip(&table.rows) {
            for (c, value) in (0u16..).zip(row) {
                if value.is_empty() {
                    continue;
                }
                sheet.write_string(r, c, value.as_str())?;
            }
        }
        Ok(())
    }

    /// Write `table` as a one-sheet workbook at `path`. Cells are written as text; empty cells
    /// are left blank.
    pub fn write_workbook(
        table: &RawTable,
        sheet_name: &str,
        path: impl AsRef<Path>,
    ) -> ImportResult<()> {
        let mut workbook = Workbook::new();
        fill_sheet(workbook.add_worksheet(), table, sheet_name)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    /// Encode `table` as an in-memory `.xlsx` file.
    pub fn workbook_bytes(table: &RawTable, sheet_name: &str) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        fill_sheet(workbook.add_worksheet(), table, sheet_name)?;
        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(feature = "excel_writer")]
pub use workbook::{workbook_bytes, write_workbook};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{convert_with, NormalizeOptions, SplitPolicy};

    #[test]
    fn reconciled_conversion_reproduces_pushinpay_example() {
        let conv = convert_with(
            &daily_sales_example(),
            &NormalizeOptions {
                split_policy: SplitPolicy::ReconcileCents,
                ..Default::default()
            },
        )
        .unwrap();
        let expected = pushinpay_example();
        assert_eq!(conv.table.headers(), expected.headers());
        assert_eq!(&conv.table.rows[..expected.row_count()], &expected.rows[..]);
        // Days 4 and 5 add three more rows.
        assert_eq!(conv.table.data_row_count(), 9);
    }

    #[test]
    fn examples_have_rectangular_rows() {
        for table in [daily_sales_example(), pushinpay_example()] {
            let width = table.headers().len();
            assert!(table.rows.iter().all(|r| r.len() == width));
        }
    }
}
