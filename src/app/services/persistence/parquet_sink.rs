//! Parquet table sink
//!
//! Writes two files per read: one row per consolidated selection and one row
//! per issue. Line-level records stay in the JSON sink.

use chrono::Utc;
use polars::prelude::{DataFrame, ParquetCompression, ParquetWriter, df};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{
    ReadSink, SourceRead, StoredRead, create_new_file, ensure_directory, generate_read_id,
};
use crate::app::models::DexReadResult;
use crate::{Error, Result};

/// Writes `<read_id>_selections.parquet` and `<read_id>_issues.parquet`
#[derive(Debug, Clone)]
pub struct ParquetSink {
    directory: PathBuf,
}

impl ParquetSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// One row per consolidated selection
pub fn selections_frame(read_id: &str, result: &DexReadResult) -> Result<DataFrame> {
    let selections = &result.selections;
    let rows = selections.len();

    let df = df!(
        "read_id" => vec![read_id.to_string(); rows],
        "dialect" => vec![result.dialect.name().to_string(); rows],
        "selection_code" => selections.iter().map(|s| s.selection_code.clone()).collect::<Vec<_>>(),
        "grid_row" => selections.iter().map(|s| s.grid_position.as_ref().map(|p| p.row.clone())).collect::<Vec<_>>(),
        "grid_column" => selections.iter().map(|s| s.grid_position.as_ref().map(|p| p.column.clone())).collect::<Vec<_>>(),
        "product_id" => selections.iter().map(|s| s.product_id.clone()).collect::<Vec<_>>(),
        "price_cents" => selections.iter().map(|s| s.price_cents).collect::<Vec<_>>(),
        "capacity" => selections.iter().map(|s| s.capacity).collect::<Vec<_>>(),
        "units_sold" => selections.iter().map(|s| s.units_sold).collect::<Vec<_>>(),
        "revenue_cents" => selections.iter().map(|s| s.revenue_cents).collect::<Vec<_>>(),
        "test_vends" => selections.iter().map(|s| s.test_vends).collect::<Vec<_>>(),
        "free_vends" => selections.iter().map(|s| s.free_vends).collect::<Vec<_>>(),
        "cash_sales_count" => selections.iter().map(|s| s.cash_sales_count).collect::<Vec<_>>(),
        "cash_sales_cents" => selections.iter().map(|s| s.cash_sales_cents).collect::<Vec<_>>(),
        "cashless_sales_count" => selections.iter().map(|s| s.cashless_sales_count).collect::<Vec<_>>(),
        "cashless_sales_cents" => selections.iter().map(|s| s.cashless_sales_cents).collect::<Vec<_>>(),
        "discount_count" => selections.iter().map(|s| s.discount_count).collect::<Vec<_>>(),
        "discount_cents" => selections.iter().map(|s| s.discount_cents).collect::<Vec<_>>(),
        "sold_out_at" => selections.iter().map(|s| s.sold_out_at.clone()).collect::<Vec<_>>(),
        "first_line" => selections.iter().map(|s| s.line_numbers.first().map(|l| *l as i64)).collect::<Vec<_>>(),
        "subtypes" => selections.iter().map(|s| join_subtypes(&s.subtypes)).collect::<Vec<_>>(),
    )
    .map_err(|e| Error::parquet_writing("Failed to build selections table", e))?;

    Ok(df)
}

/// One row per issue
pub fn issues_frame(read_id: &str, result: &DexReadResult) -> Result<DataFrame> {
    let issues = &result.issues;
    let rows = issues.len();

    let df = df!(
        "read_id" => vec![read_id.to_string(); rows],
        "line_number" => issues.iter().map(|i| i.line_number.map(|l| l as i64)).collect::<Vec<_>>(),
        "field_index" => issues.iter().map(|i| i.field_index.map(|f| f as i64)).collect::<Vec<_>>(),
        "kind" => issues.iter().map(|i| i.kind.label().to_string()).collect::<Vec<_>>(),
        "message" => issues.iter().map(|i| i.message.clone()).collect::<Vec<_>>(),
    )
    .map_err(|e| Error::parquet_writing("Failed to build issues table", e))?;

    Ok(df)
}

fn join_subtypes(subtypes: &[u8]) -> String {
    subtypes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_frame(path: &Path, mut df: DataFrame) -> Result<()> {
    let file = create_new_file(path)?;

    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)
        .map_err(|e| Error::parquet_writing(format!("Failed to write {}", path.display()), e))?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

impl ReadSink for ParquetSink {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn store(&self, source: &SourceRead, result: &DexReadResult) -> Result<StoredRead> {
        ensure_directory(&self.directory)?;

        let read_id = generate_read_id(source, Utc::now());
        let selections_path = self
            .directory
            .join(format!("{}_selections.parquet", read_id));
        let issues_path = self.directory.join(format!("{}_issues.parquet", read_id));

        write_frame(&selections_path, selections_frame(&read_id, result)?)?;
        write_frame(&issues_path, issues_frame(&read_id, result)?)?;

        info!(
            "Stored read {} as {} selections and {} issues",
            read_id,
            result.selections.len(),
            result.issues.len()
        );

        Ok(StoredRead {
            read_id,
            paths: vec![selections_path, issues_path],
        })
    }
}
