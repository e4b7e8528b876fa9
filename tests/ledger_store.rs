use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, TimeZone, Utc};
use sales_import::ids::SequentialIdGenerator;
use sales_import::ledger::{
    calculate_kpis, daily_sales_series, format_brl, FileStore, FinancialStore, KeyValueStore,
    Period, FINANCIAL_DATA_KEY,
};
use sales_import::processing::{import_rows, NormalizeOptions};
use sales_import::templates::daily_sales_example;
use sales_import::types::{ColumnMapping, ColumnRole, SchemaKind};

fn tmp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sales-import-ledger-{nanos}"))
}

fn imported_example_sales() -> Vec<sales_import::types::Sale> {
    let mapping = ColumnMapping::new(SchemaKind::DailyAggregated)
        .with(ColumnRole::Year, "Ano")
        .with(ColumnRole::Month, "Mês")
        .with(ColumnRole::Day, "Dia")
        .with(ColumnRole::Quantity, "Vendas")
        .with(ColumnRole::GrossValue, "Valor Vendas")
        .with(ColumnRole::NetValue, "Total Recebido");
    import_rows(
        &daily_sales_example(),
        &mapping,
        &NormalizeOptions::default(),
        &SequentialIdGenerator::new("s"),
    )
    .unwrap()
    .sales
}

#[test]
fn file_store_persists_imported_sales_across_instances() {
    let dir = tmp_dir();
    let mut store = FinancialStore::new(FileStore::new(&dir));
    assert!(store.load().unwrap().sales.is_empty());

    store.append_sales(imported_example_sales()).unwrap();
    assert!(dir.join(format!("{FINANCIAL_DATA_KEY}.json")).exists());

    let reopened = FinancialStore::new(FileStore::new(&dir));
    let data = reopened.load().unwrap();
    assert_eq!(data.sales.len(), 9);
    assert_eq!(data.sales[0].id, "s-1");

    let raw = FileStore::new(&dir).get(FINANCIAL_DATA_KEY).unwrap().unwrap();
    assert!(raw.contains("\"grossValue\""));
    assert!(raw.contains("\"source\":\"pushinpay\""));

    store.clear().unwrap();
    assert!(reopened.load().unwrap().sales.is_empty());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn kpis_over_imported_example() {
    let sales = imported_example_sales();
    let kpi = calculate_kpis(&sales, &[], &[], None);
    assert_eq!(kpi.total_sales, 9);
    assert!((kpi.gross_revenue - 134.1).abs() < 1e-9);
    assert!((kpi.average_ticket - 14.9).abs() < 1e-9);
    assert_eq!(format_brl(kpi.gross_revenue), "R$\u{a0}134,10");

    let first_two_days = Period::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
    );
    let kpi = calculate_kpis(&sales, &[], &[], Some(first_two_days));
    assert_eq!(kpi.total_sales, 3);
}

#[test]
fn daily_series_covers_the_example_days() {
    let sales = imported_example_sales();
    let today = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let series = daily_sales_series(&sales, 4, today);

    let labels: Vec<&str> = series.iter().map(|p| p.formatted_date.as_str()).collect();
    assert_eq!(labels, vec!["01/01", "02/01", "03/01", "04/01", "05/01"]);
    assert!((series[2].value - 42.47).abs() < 1e-9);
}
