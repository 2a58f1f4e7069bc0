//! CSV Data Loader Module
//! Reads the campaign CSV with Polars and splits it into raw text records.

use super::record::RawRecord;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads delimited text into [`RawRecord`]s.
///
/// Every column is read as text (schema inference is disabled) so that type
/// coercion happens in one place, the preparer. Cells beyond the header width
/// are dropped; short rows read their missing cells as empty.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk.
    pub fn load_csv(file_path: &Path) -> Result<Vec<RawRecord>, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_truncate_ragged_lines(true)
            .finish()?
            .collect()?;

        let records = Self::records_from_dataframe(&df)?;
        tracing::info!(
            path = %file_path.display(),
            rows = records.len(),
            columns = df.width(),
            "CSV loaded"
        );
        Ok(records)
    }

    /// Parse CSV text already held in memory.
    pub fn parse_csv_text(text: &str) -> Result<Vec<RawRecord>, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        Self::records_from_dataframe(&df)
    }

    /// Convert each DataFrame row into a [`RawRecord`], preserving row order.
    pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<RawRecord>, LoaderError> {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                Ok((series.name().to_string(), series.str()?))
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let records = (0..df.height())
            .map(|i| {
                let mut record = RawRecord::new();
                for (name, values) in &columns {
                    if let Some(value) = values.get(i) {
                        record.insert(name.as_str(), value);
                    }
                }
                record
            })
            .collect();

        Ok(records)
    }
}
