//! Data Cleaner Module
//! Handles duplicate removal, column dropping and derived columns.
//!
//! Every operation takes the table by reference and returns a new one.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Layouts tried in order when parsing date text.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%d-%b-%y"];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}' has type {found}, expected {expected}")]
    UnexpectedType {
        column: String,
        expected: &'static str,
        found: String,
    },
}

pub(crate) fn has_column(df: &DataFrame, column: &str) -> bool {
    df.get_column_index(column).is_some()
}

fn require_column(df: &DataFrame, column: &str) -> Result<(), CleanError> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(CleanError::MissingColumn(column.to_string()))
    }
}

/// Values of a column rendered as text; nulls stay `None`.
pub(crate) fn text_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let col = df.column(column)?.cast(&DataType::String)?;
    Ok(col
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Values of a column cast to f64; nulls, NaN and non-numeric text become `None`.
pub(crate) fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
    let col = df.column(column)?.cast(&DataType::Float64)?;
    Ok(col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Elements of a `List(String)` column.
pub(crate) fn list_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<Vec<String>>>> {
    let col = df.column(column)?;
    let ca = col.list()?;
    ca.into_iter()
        .map(|item| {
            item.map(|inner| -> PolarsResult<Vec<String>> {
                let inner = inner.cast(&DataType::String)?;
                Ok(inner
                    .str()?
                    .into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect())
            })
            .transpose()
        })
        .collect()
}

/// Values of a `Date` column as calendar dates.
pub(crate) fn date_values(df: &DataFrame, column: &str) -> Result<Vec<Option<NaiveDate>>, CleanError> {
    require_column(df, column)?;
    let col = df.column(column)?;
    if col.dtype() != &DataType::Date {
        return Err(CleanError::UnexpectedType {
            column: column.to_string(),
            expected: "Date",
            found: col.dtype().to_string(),
        });
    }
    let days = col.cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE)))
        .collect())
}

/// Parse date text using the supported layouts. `None` when nothing matches.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Handles data cleaning and transformation operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows that exactly repeat an earlier row, keeping the first.
    pub fn drop_duplicates(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let cleaned = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        debug!("drop_duplicates: {} -> {} rows", df.height(), cleaned.height());
        Ok(cleaned)
    }

    /// Number of rows `drop_duplicates` would remove.
    pub fn duplicate_count(df: &DataFrame) -> Result<usize, CleanError> {
        Ok(df.height() - Self::drop_duplicates(df)?.height())
    }

    /// Drop the named columns. Nothing is dropped if any name is absent.
    pub fn drop_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame, CleanError> {
        for name in names {
            require_column(df, name)?;
        }
        let mut out = df.clone();
        for name in names {
            out = out.drop(name)?;
        }
        Ok(out)
    }

    /// Replace a text column with a `Date` column. Unparsable values become null.
    pub fn parse_date(df: &DataFrame, column: &str) -> Result<DataFrame, CleanError> {
        require_column(df, column)?;
        let raw = text_values(df, column)?;

        let mut failures = 0usize;
        let days: Vec<Option<i32>> = raw
            .iter()
            .map(|v| {
                let v = v.as_deref()?;
                let parsed = parse_date_text(v);
                if parsed.is_none() {
                    failures += 1;
                    debug!("unparsable date in '{}': {:?}", column, v);
                }
                parsed.map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            })
            .collect();

        if failures > 0 {
            warn!("{} values in '{}' could not be parsed as dates", failures, column);
        }

        let dates = Column::new(column.into(), days).cast(&DataType::Date)?;
        let mut out = df.clone();
        out.with_column(dates)?;
        Ok(out)
    }

    /// Split a delimited text column into a `List(String)` column named `into`.
    pub fn split_field(
        df: &DataFrame,
        column: &str,
        delimiter: &str,
        into: &str,
    ) -> Result<DataFrame, CleanError> {
        require_column(df, column)?;
        let raw = text_values(df, column)?;

        let lists: ListChunked = raw
            .iter()
            .map(|v| {
                v.as_deref().map(|text| {
                    let pieces: Vec<String> = text
                        .split(delimiter)
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect();
                    Series::new(PlSmallStr::EMPTY, pieces)
                })
            })
            .collect();

        let mut out = df.clone();
        out.with_column(Column::from(lists.with_name(into.into()).into_series()))?;
        Ok(out)
    }

    /// Append Int32 year and month columns taken from a `Date` column.
    pub fn derive_year_month(
        df: &DataFrame,
        date_column: &str,
        year_name: &str,
        month_name: &str,
    ) -> Result<DataFrame, CleanError> {
        let dates = date_values(df, date_column)?;
        let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();
        let months: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();

        let mut out = df.clone();
        out.with_column(Column::new(year_name.into(), years))?;
        out.with_column(Column::new(month_name.into(), months))?;
        Ok(out)
    }

    /// Keep rows whose text value in `column` equals `value`.
    pub fn filter_eq(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame, CleanError> {
        require_column(df, column)?;
        let filtered = df
            .clone()
            .lazy()
            .filter(col(column).cast(DataType::String).eq(lit(value)))
            .collect()?;
        Ok(filtered)
    }

    /// Null count per column, in column order.
    pub fn missing_values(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Append `numerator / denominator` as a Float64 column.
    /// A null operand or a zero denominator yields null.
    pub fn derive_ratio(
        df: &DataFrame,
        numerator: &str,
        denominator: &str,
        into: &str,
    ) -> Result<DataFrame, CleanError> {
        require_column(df, numerator)?;
        require_column(df, denominator)?;
        let num = numeric_values(df, numerator)?;
        let den = numeric_values(df, denominator)?;

        let ratio: Vec<Option<f64>> = num
            .iter()
            .zip(den.iter())
            .map(|(n, d)| match (n, d) {
                (Some(n), Some(d)) if *d != 0.0 => Some(n / d),
                _ => None,
            })
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(into.into(), ratio))?;
        Ok(out)
    }
}
