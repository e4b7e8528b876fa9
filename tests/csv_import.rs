use sales_import::ids::SequentialIdGenerator;
use sales_import::ingestion::csv::{
    read_csv_table_from_path, read_csv_table_from_reader, read_csv_table_from_str,
};
use sales_import::processing::{detect_schema, import_rows, NormalizeOptions, RoleMatch};
use sales_import::types::{ColumnMapping, ColumnRole, SaleSource, SchemaKind};

fn pushinpay_mapping() -> ColumnMapping {
    ColumnMapping::new(SchemaKind::Transactional)
        .with(ColumnRole::Date, "Data")
        .with(ColumnRole::GrossValue, "Valor Unitário")
        .with(ColumnRole::NetValue, "Total Recebido")
}

#[test]
fn read_csv_fixture_keeps_quoted_decimal_commas() {
    let table = read_csv_table_from_path("tests/fixtures/daily_sales.csv").unwrap();

    // Blank line dropped: header + 5 rows.
    assert_eq!(table.row_count(), 6);
    assert_eq!(
        table.rows[1],
        vec!["2025", "Janeiro", "1", "2", "29,80", "28,31"]
    );
    assert_eq!(table.rows[5][0], "Total");
}

#[test]
fn detection_on_pushinpay_header_follows_keyword_order() {
    let table = read_csv_table_from_path("tests/fixtures/pushinpay.csv").unwrap();
    let detection = detect_schema(table.headers());

    assert_eq!(detection.schema, SchemaKind::Transactional);
    assert_eq!(detection.role(ColumnRole::Date), &RoleMatch::Found("Data".to_string()));
    // "Total Recebido" hits the gross keyword "total" first; callers override it.
    assert_eq!(
        detection.role(ColumnRole::GrossValue),
        &RoleMatch::Found("Total Recebido".to_string())
    );
}

#[test]
fn import_pushinpay_fixture_with_explicit_mapping() {
    let table = read_csv_table_from_path("tests/fixtures/pushinpay.csv").unwrap();
    let ids = SequentialIdGenerator::new("pp");
    let outcome = import_rows(&table, &pushinpay_mapping(), &NormalizeOptions::default(), &ids)
        .unwrap();

    assert_eq!(outcome.sales.len(), 4);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.sales[0].id, "pp-1");
    assert_eq!(outcome.sales[0].date, "2025-01-01T00:00:00.000Z");
    assert_eq!(outcome.sales[1].net_value, 14.15);
    assert_eq!(outcome.sales[2].date, "2025-01-02T00:00:00.000Z");
    assert_eq!(outcome.sales[2].gross_value, 14.9);
    assert_eq!(outcome.sales[3].gross_value, 1014.9);
    assert_eq!(outcome.sales[3].net_value, 1000.0);
    assert!(outcome.sales.iter().all(|s| s.source == SaleSource::PushinPay));
}

#[test]
fn read_csv_from_custom_reader() {
    let input = "Data,Valor Bruto,Valor Líquido\n15/03/2024,\"10,00\",\"9,50\"\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input.as_bytes());

    let table = read_csv_table_from_reader(&mut rdr).unwrap();
    assert_eq!(table.data_row_count(), 1);
    assert_eq!(table.rows[1][2], "9,50");
}

#[test]
fn stray_quotes_are_removed() {
    let table = read_csv_table_from_str("Data,Valor\n15/03/2024,10 \"reais\"\n").unwrap();
    assert_eq!(table.rows[1][1], "10 reais");
}
