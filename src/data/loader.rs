//! CSV Data Loader Module
//! Reads a delimited file with a header row into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file. Empty fields become nulls.
    ///
    /// A missing or unreadable file is reported as [`LoaderError::Io`] before
    /// Polars is involved; malformed content surfaces as [`LoaderError::Csv`].
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let file_path = file_path.as_ref();
        std::fs::File::open(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        info!(
            "loaded {} ({} rows x {} columns)",
            file_path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    /// Column names in file order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }
}
