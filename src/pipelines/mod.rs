//! Pipelines module - The two analysis runs
//!
//! Each pipeline is split into a pure `analyze` step producing a summary and
//! a `render` step drawing it, so the numbers can be checked without fonts.

pub mod netflix;
pub mod population;

use crate::charts::RenderError;
use crate::data::{CleanError, ExportError, LoaderError};
use crate::stats::{AggregateError, AggregateResult};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Print a titled aggregate to stdout.
pub(crate) fn print_section(title: &str, result: &AggregateResult) {
    println!("{}:", title);
    println!("{}\n", result);
}

/// Print per-column null counts to stdout.
pub(crate) fn print_missing(title: &str, missing: &[(String, usize)]) {
    println!("{}:", title);
    let width = missing.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0);
    for (column, count) in missing {
        println!("{:<width$}    {}", column, count, width = width);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn read_column(df: &DataFrame, name: &str) -> Result<usize, PipelineError> {
        Ok(df.column(name)?.len())
    }

    #[test]
    fn test_polars_error_passes_through() {
        let df = df!("title" => &["a", "b"]).unwrap();
        assert_eq!(read_column(&df, "title").unwrap(), 2);
        let err = read_column(&df, "director").unwrap_err();
        assert!(matches!(err, PipelineError::Polars(_)));
        assert!(err.to_string().contains("director"));
    }
}
