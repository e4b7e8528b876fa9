use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sales_import::ids::SequentialIdGenerator;
use sales_import::ingestion::{
    import_from_path, read_table_from_path, ImportOptions, ImportRequest, InputFormat,
};
use sales_import::parsing::ParseMode;
use sales_import::processing::{NormalizeOptions, SplitPolicy};
use sales_import::types::{ColumnMapping, ColumnRole, SchemaKind};
use sales_import::ImportError;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sales-import-unified-{nanos}.{ext}"))
}

fn daily_mapping() -> ColumnMapping {
    ColumnMapping::new(SchemaKind::DailyAggregated)
        .with(ColumnRole::Year, "Ano")
        .with(ColumnRole::Month, "Mês")
        .with(ColumnRole::Day, "Dia")
        .with(ColumnRole::Quantity, "Vendas")
        .with(ColumnRole::GrossValue, "Valor Vendas")
        .with(ColumnRole::NetValue, "Total Recebido")
}

fn options_with_ids(prefix: &str) -> ImportOptions {
    ImportOptions {
        id_generator: Arc::new(SequentialIdGenerator::new(prefix)),
        ..Default::default()
    }
}

#[test]
fn detected_mapping_leaves_ambiguous_values_unmapped() {
    let err = import_from_path("tests/fixtures/daily_sales.csv", None, &ImportOptions::default())
        .unwrap_err();
    match err {
        ImportError::IncompleteMapping { missing } => {
            assert_eq!(missing, vec![ColumnRole::GrossValue, ColumnRole::NetValue])
        }
        other => panic!("expected IncompleteMapping, got {other:?}"),
    }
}

#[test]
fn daily_csv_with_mapping_expands_rows_and_reports_bad_dates() {
    let outcome = import_from_path(
        "tests/fixtures/daily_sales.csv",
        Some(&daily_mapping()),
        &options_with_ids("d"),
    )
    .unwrap();

    // 2 + 1 + 3 sales; 30 February and the Total row are skipped.
    assert_eq!(outcome.sales.len(), 6);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].row_index, 3);
    assert_eq!(outcome.skipped_rows, 2);
    assert_eq!(outcome.sales[0].id, "d-1");
    assert_eq!(outcome.sales[0].gross_value, 14.9);
    assert!((outcome.sales[0].net_value - 14.155).abs() < 1e-9);
    assert_eq!(outcome.sales[5].date, "2025-01-03T00:00:00.000Z");
    assert_eq!(
        outcome.summary(),
        "6 sales imported, 1 row with problems skipped"
    );
}

#[test]
fn reconciled_split_keeps_whole_cents() {
    let opts = ImportOptions {
        normalize: NormalizeOptions {
            split_policy: SplitPolicy::ReconcileCents,
            ..Default::default()
        },
        ..options_with_ids("r")
    };
    let outcome =
        import_from_path("tests/fixtures/daily_sales.csv", Some(&daily_mapping()), &opts).unwrap();
    let nets: Vec<f64> = outcome.sales.iter().map(|s| s.net_value).collect();
    assert_eq!(nets, vec![14.16, 14.15, 14.16, 14.16, 14.16, 14.15]);
}

#[test]
fn strict_mode_still_imports_clean_rows() {
    let mapping = ColumnMapping::new(SchemaKind::Transactional)
        .with(ColumnRole::Date, "Data")
        .with(ColumnRole::GrossValue, "Valor Unitário")
        .with(ColumnRole::NetValue, "Total Recebido");
    let opts = ImportOptions {
        normalize: NormalizeOptions {
            parse_mode: ParseMode::Strict,
            ..Default::default()
        },
        ..Default::default()
    };
    let outcome =
        import_from_path("tests/fixtures/pushinpay.csv", Some(&mapping), &opts).unwrap();
    assert_eq!(outcome.sales.len(), 4);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn forced_format_overrides_extension() {
    let path = tmp_file("txt");
    std::fs::copy("tests/fixtures/daily_sales.csv", &path).unwrap();

    let err = read_table_from_path(&path, &ImportOptions::default()).unwrap_err();
    assert!(err.to_string().contains("cannot infer format"));

    let opts = ImportOptions {
        format: Some(InputFormat::Csv),
        ..Default::default()
    };
    let table = read_table_from_path(&path, &opts).unwrap();
    assert_eq!(table.data_row_count(), 5);
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_file_is_io_error() {
    let err = import_from_path("tests/fixtures/does_not_exist.csv", None, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ImportError::Csv(_) | ImportError::Io(_)));
}

#[test]
fn import_request_runs_with_owned_inputs() {
    let req = ImportRequest {
        path: PathBuf::from("tests/fixtures/daily_sales.csv"),
        mapping: Some(daily_mapping()),
        options: options_with_ids("q"),
    };
    assert_eq!(req.run().unwrap().imported(), 6);
}

#[test]
fn windows_1252_csv_keeps_every_row() {
    let path = tmp_file("csv");
    let mut bytes = b"Data,Produto,Valor Bruto,Valor L\xedquido\n".to_vec();
    bytes.extend_from_slice(b"15/03/2024,Curso,\"10,00\",\"9,50\"\n");
    bytes.extend_from_slice(b"16/03/2024,Edi\xe7\xe3o,\"20,00\",\"19,00\"\n");
    std::fs::write(&path, &bytes).unwrap();

    let mapping = ColumnMapping::new(SchemaKind::Transactional)
        .with(ColumnRole::Date, "Data")
        .with(ColumnRole::GrossValue, "Valor Bruto")
        .with(ColumnRole::NetValue, "Valor L\u{fffd}quido");
    let outcome = import_from_path(&path, Some(&mapping), &options_with_ids("w")).unwrap();

    assert_eq!(outcome.imported(), 2);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.sales[1].gross_value, 20.0);
    assert_eq!(outcome.sales[1].net_value, 19.0);
    let _ = std::fs::remove_file(path);
}

#[cfg(feature = "excel_test_writer")]
#[test]
fn workbook_template_imports_like_the_table() {
    use sales_import::ingestion::ExcelSheetSelection;
    use sales_import::templates::{daily_sales_example, write_workbook, DAILY_SALES_SHEET};

    let path = tmp_file("xlsx");
    write_workbook(&daily_sales_example(), DAILY_SALES_SHEET, &path).unwrap();

    let opts = ImportOptions {
        excel_sheet: ExcelSheetSelection::Sheet(DAILY_SALES_SHEET.to_string()),
        ..options_with_ids("x")
    };
    let outcome = import_from_path(&path, Some(&daily_mapping()), &opts).unwrap();
    assert_eq!(outcome.sales.len(), 9);
    assert_eq!(outcome.sales[8].date, "2025-01-05T00:00:00.000Z");
    let _ = std::fs::remove_file(path);
}
