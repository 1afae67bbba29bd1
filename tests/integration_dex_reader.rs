//! Integration tests for the DEX reader with audit files on disk
//!
//! These tests drive the public API end to end: reading fixture files,
//! resolving dialects, consolidating selections, inferring grids and storing
//! results through the persistence sinks.

use dex_reader::app::models::{GridConvention, GridPosition, IssueKind};
use dex_reader::app::services::persistence::{
    JsonSink, ParquetSink, ReadSink, SourceRead, StoreFormat, create_sink,
};
use dex_reader::cli::commands::parse::parse_files;
use dex_reader::cli::commands::shared::resolve_inputs;
use dex_reader::{Config, DexParser, Dialect, Error, ParseOptions};
use polars::prelude::{ParquetReader, SerReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Full Crane audit with cash, cashless and vendor-extension segments
///
/// Purpose: Validate the whole pipeline on a realistic CRLF-terminated file
/// Benefit: Catches regressions where stages disagree about line numbers or context
#[tokio::test]
async fn test_crane_machine_file() {
    let result = DexParser::default()
        .parse_file(&fixture("crane_machine.dex"))
        .await
        .expect("Failed to parse Crane fixture");

    assert!(result.success);
    assert_eq!(result.dialect, Dialect::Crane);
    assert_eq!(result.manufacturer_code.as_deref(), Some("CN"));
    assert_eq!(result.records.len(), 22);

    // Only the vendor extension segment is reported
    assert_eq!(result.issues.len(), 1, "unexpected issues: {:?}", result.issues);
    let unknown = result.issues_of(IssueKind::UnknownRecord);
    assert_eq!(unknown[0].line_number, Some(19));

    let codes: Vec<&str> = result
        .selections
        .iter()
        .map(|s| s.selection_code.as_str())
        .collect();
    assert_eq!(codes, ["A1", "A2", "B1"]);

    let a1 = result.selection("A1").unwrap();
    assert_eq!(a1.price_cents, Some(150));
    assert_eq!(a1.capacity, Some(10));
    assert_eq!(a1.product_id.as_deref(), Some("COLA"));
    assert_eq!(a1.units_sold, Some(30));
    assert_eq!(a1.revenue_cents, Some(4500));
    assert_eq!(a1.cash_sales_count, Some(20));
    assert_eq!(a1.cash_sales_cents, Some(3000));
    assert_eq!(a1.cashless_sales_count, Some(10));
    assert_eq!(a1.cashless_sales_cents, Some(1500));
    assert_eq!(a1.subtypes, vec![1, 2, 7]);

    let a2 = result.selection("A2").unwrap();
    assert_eq!(a2.sold_out_at.as_deref(), Some("20240301 1015"));

    let b1 = result.selection("B1").unwrap();
    assert_eq!(b1.test_vends, Some(2));
    assert_eq!(b1.grid_position, Some(GridPosition::new("B", "1")));

    assert_eq!(result.grid.convention, GridConvention::AlphaRowNumericColumn);
    assert_eq!(result.grid.rows, 2);
    assert_eq!(result.grid.columns, 2);

    let stats = result.stats();
    assert_eq!(stats.unknown_records, 1);
    assert_eq!(stats.records_failed, 0);
    assert!(stats.is_successful());
}

/// Flat numeric selection codes need a column count
///
/// Purpose: Verify the grid falls back to FlatSequential only with a hint
/// Benefit: Ensures Dixie-Narco layouts are reported instead of silently misplaced
#[tokio::test]
async fn test_dixie_narco_flat_numbering() {
    let path = fixture("dixie_narco_flat.dex");

    let without_hint = DexParser::default().parse_file(&path).await.unwrap();
    assert_eq!(without_hint.dialect, Dialect::DixieNarco);
    assert_eq!(without_hint.grid.convention, GridConvention::NoPattern);
    assert_eq!(
        without_hint.issues_of(IssueKind::GridInferenceWarning).len(),
        2
    );
    assert!(without_hint.selections.iter().all(|s| s.grid_position.is_none()));

    let with_hint = DexParser::new(ParseOptions::default().with_column_hint(10))
        .parse_file(&path)
        .await
        .unwrap();
    assert_eq!(with_hint.grid.convention, GridConvention::FlatSequential);
    assert!(with_hint.issues.is_empty(), "unexpected issues: {:?}", with_hint.issues);

    let soda = with_hint.selection("1").unwrap();
    assert_eq!(soda.capacity, Some(10));
    assert_eq!(soda.price_cents, Some(125));
    assert_eq!(soda.product_id.as_deref(), Some("SODA"));
    assert_eq!(soda.units_sold, Some(12));
    assert_eq!(soda.grid_position, Some(GridPosition::new("1", "1")));

    let juice = with_hint.selection("10").unwrap();
    assert_eq!(juice.units_sold, None);
    assert_eq!(juice.sold_out_at.as_deref(), Some("20240301 0930"));
    assert_eq!(juice.grid_position, Some(GridPosition::new("1", "10")));

    let water = with_hint.selection("100").unwrap();
    assert_eq!(water.grid_position, Some(GridPosition::new("10", "10")));
}

/// Automatic Products reports money in whole currency units
#[tokio::test]
async fn test_automatic_products_money_units() {
    let result = DexParser::default()
        .parse_file(&fixture("automatic_products.dex"))
        .await
        .unwrap();

    assert_eq!(result.dialect, Dialect::AutomaticProducts);
    assert_eq!(result.selection("11").unwrap().price_cents, Some(150));
    assert_eq!(result.selection("11").unwrap().revenue_cents, Some(3000));
    assert_eq!(result.selection("12").unwrap().revenue_cents, Some(1250));
    assert_eq!(result.selection("21").unwrap().price_cents, Some(200));

    assert_eq!(result.grid.convention, GridConvention::NumericRowTimesTen);
    assert_eq!(
        result.selection("21").unwrap().grid_position,
        Some(GridPosition::new("2", "1"))
    );
}

/// Parsing the same file twice yields identical results and serializations
#[tokio::test]
async fn test_file_parsing_is_deterministic() {
    let parser = DexParser::default();
    let path = fixture("crane_machine.dex");

    let first = parser.parse_file(&path).await.unwrap();
    let second = parser.parse_file(&path).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_missing_file() {
    let result = DexParser::default()
        .parse_file(Path::new("/nonexistent/machine.dex"))
        .await;
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

/// Purpose: Store one read through both sinks and read the output back
#[tokio::test]
async fn test_store_read_through_sinks() {
    let temp_dir = TempDir::new().unwrap();
    let path = fixture("crane_machine.dex");
    let text = std::fs::read_to_string(&path).unwrap();
    let result = DexParser::default().parse_str(&text);
    let source = SourceRead::new(text.clone())
        .with_device("route-4-machine-9")
        .with_path(&path);

    let json_stored = JsonSink::new(temp_dir.path().join("json"))
        .store(&source, &result)
        .unwrap();
    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_stored.paths[0]).unwrap()).unwrap();
    assert_eq!(document["raw_input"], text.as_str());
    assert_eq!(document["result"]["selections"].as_array().unwrap().len(), 3);

    let parquet_stored = ParquetSink::new(temp_dir.path().join("parquet"))
        .store(&source, &result)
        .unwrap();
    let selections =
        ParquetReader::new(std::fs::File::open(&parquet_stored.paths[0]).unwrap())
            .finish()
            .unwrap();
    assert_eq!(selections.height(), 3);

    assert!(json_stored.read_id.starts_with("route-4-machine-9-"));
    assert!(parquet_stored.read_id.starts_with("route-4-machine-9-"));
}

/// Purpose: Drive the CLI pipeline over a directory of fixtures
/// Benefit: Exercises input discovery, concurrent parsing and storage together
#[tokio::test]
async fn test_parse_fixture_directory() {
    let temp_dir = TempDir::new().unwrap();
    let fixtures = fixture("");

    let files = resolve_inputs(&[fixtures.display().to_string()]).unwrap();
    assert_eq!(files.len(), 3);

    let sink: Arc<dyn ReadSink> =
        Arc::from(create_sink(StoreFormat::Parquet, temp_dir.path()));
    let reports = parse_files(
        files.clone(),
        Arc::new(DexParser::default()),
        Some(sink),
        None,
        2,
        None,
    )
    .await;

    assert_eq!(reports.len(), 3);
    for (report, file) in reports.iter().zip(&files) {
        assert_eq!(&report.path, file);
        assert!(report.error.is_none());
        assert!(report.read_id.is_some());
    }

    // Two Parquet tables per read
    let written = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(written, 6);
}

/// Configuration file settings flow into the parser options
#[tokio::test]
async fn test_configured_alias_and_hint() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[parsing]\ncolumn_hint = 4\n\n[dialects.aliases]\nVEN = \"dixie_narco\"\n",
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let text = "DXS*VEN0001*VA*V1/1*1\nPA1*1*10*125*SODA\nPA1*5*10*125*SODA\n";
    let result = DexParser::new(config.parse_options().unwrap()).parse_str(text);

    assert_eq!(result.dialect, Dialect::DixieNarco);
    assert_eq!(result.manufacturer_code.as_deref(), Some("VEN"));
    assert_eq!(result.selection("1").unwrap().capacity, Some(10));
    assert_eq!(result.grid.convention, GridConvention::FlatSequential);
    assert_eq!(
        result.selection("5").unwrap().grid_position,
        Some(GridPosition::new("2", "1"))
    );
}
