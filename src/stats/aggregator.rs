//! Aggregation Module
//! Value counts, group sums, top/bottom slices, shares and wide-to-long reshaping.
//!
//! Every aggregate is ordered descending by measure. Entries with equal
//! measures keep the order in which their key was first encountered.

use crate::data::{has_column, numeric_values, text_values};
use polars::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column label '{0}' does not start with a year")]
    InvalidYearLabel(String),
}

/// Category key of an aggregate: one value, or a tuple for multi-column groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn single(value: impl Into<String>) -> Self {
        Self(vec![value.into()])
    }

    pub fn tuple(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::single(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEntry {
    pub key: GroupKey,
    pub value: f64,
}

/// Sorted mapping from category key to a numeric measure.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub key_label: String,
    pub measure_label: String,
    pub entries: Vec<AggregateEntry>,
}

/// One cell of a wide year-column table in long form.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltedTriple {
    pub entity: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// Descending by value; stable, so ties keep their current order.
fn sort_descending(entries: &mut [AggregateEntry]) {
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn format_measure(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}

impl AggregateResult {
    pub fn new(key_label: &str, measure_label: &str, mut entries: Vec<AggregateEntry>) -> Self {
        sort_descending(&mut entries);
        Self {
            key_label: key_label.to_string(),
            measure_label: measure_label.to_string(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.to_string() == key)
            .map(|e| e.value)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// The first `min(n, len)` entries.
    pub fn top_n(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
            ..self.clone_labels()
        }
    }

    /// The last `min(n, len)` entries, order preserved.
    pub fn bottom_n(&self, n: usize) -> Self {
        let start = self.entries.len().saturating_sub(n);
        Self {
            entries: self.entries[start..].to_vec(),
            ..self.clone_labels()
        }
    }

    /// Each measure as a percentage of the total. A zero total yields zeros.
    pub fn percentage_share(&self) -> Self {
        let total = self.total();
        let entries = self
            .entries
            .iter()
            .map(|e| AggregateEntry {
                key: e.key.clone(),
                value: if total == 0.0 { 0.0 } else { e.value / total * 100.0 },
            })
            .collect();
        Self {
            key_label: self.key_label.clone(),
            measure_label: format!("{} (%)", self.measure_label),
            entries,
        }
    }

    /// Entries ordered ascending by key; keys that are numbers compare numerically.
    pub fn sort_by_key(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| compare_keys(&a.key.to_string(), &b.key.to_string()));
        Self {
            entries,
            ..self.clone_labels()
        }
    }

    /// Drop the entry whose key equals `key`, if present.
    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.key.to_string() != key)
                .cloned()
                .collect(),
            ..self.clone_labels()
        }
    }

    fn clone_labels(&self) -> Self {
        Self {
            key_label: self.key_label.clone(),
            measure_label: self.measure_label.clone(),
            entries: Vec::new(),
        }
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|e| e.key.to_string().chars().count())
            .max()
            .unwrap_or(0)
            .max(self.key_label.chars().count());
        writeln!(f, "{}", self.key_label)?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<width$}    {}",
                entry.key.to_string(),
                format_measure(entry.value),
                width = width
            )?;
        }
        write!(f, "Name: {}, Length: {}", self.measure_label, self.entries.len())
    }
}

/// Column name the measure of a grouped frame is collected under.
const MEASURE: &str = "__measure";

const MELT_ENTITY: &str = "entity";
const MELT_YEAR: &str = "year";
const MELT_VALUE: &str = "value";

/// Handles aggregations over a DataFrame.
pub struct Aggregator;

impl Aggregator {
    fn require(df: &DataFrame, column: &str) -> Result<(), AggregateError> {
        if has_column(df, column) {
            Ok(())
        } else {
            Err(AggregateError::MissingColumn(column.to_string()))
        }
    }

    /// Group `lf` by `keys` (rows with a null key dropped), aggregate `measure`
    /// and rank descending. Groups appear in first-encountered order before
    /// the stable sort, so equal measures keep that order.
    fn ranked(
        lf: LazyFrame,
        keys: &[&str],
        measure: Expr,
        measure_label: &str,
    ) -> Result<AggregateResult, AggregateError> {
        let lf = match keys
            .iter()
            .map(|k| col(*k).is_not_null())
            .reduce(|a, b| a.and(b))
        {
            Some(present) => lf.filter(present),
            None => lf,
        };
        let by: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        let out = lf
            .group_by_stable(by)
            .agg([measure.alias(MEASURE)])
            .sort(
                [MEASURE],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        let key_values = keys
            .iter()
            .map(|k| text_values(&out, k))
            .collect::<PolarsResult<Vec<_>>>()?;
        let entries = numeric_values(&out, MEASURE)?
            .into_iter()
            .enumerate()
            .map(|(i, value)| AggregateEntry {
                key: GroupKey::tuple(
                    key_values
                        .iter()
                        .map(|k| k[i].clone().unwrap_or_default())
                        .collect(),
                ),
                value: value.unwrap_or(0.0),
            })
            .collect();
        Ok(AggregateResult::new(&keys.join(", "), measure_label, entries))
    }

    /// Count of each distinct non-null value.
    pub fn value_counts(df: &DataFrame, column: &str) -> Result<AggregateResult, AggregateError> {
        Self::require(df, column)?;
        let lf = df.clone().lazy().select([col(column)]);
        let result = Self::ranked(lf, &[column], len(), "count")?;
        debug!("value_counts({}): {} distinct", column, result.len());
        Ok(result)
    }

    /// Count of each distinct element across a list column.
    pub fn value_counts_exploded(
        df: &DataFrame,
        column: &str,
    ) -> Result<AggregateResult, AggregateError> {
        Self::require(df, column)?;
        let lf = df.clone().lazy().select([col(column).explode()]);
        Self::ranked(lf, &[column], len(), "count")
    }

    /// Sum of `value_column` per distinct non-null `group_column` value.
    pub fn group_sum(
        df: &DataFrame,
        group_column: &str,
        value_column: &str,
    ) -> Result<AggregateResult, AggregateError> {
        Self::group_sum_by(df, &[group_column], value_column)
    }

    /// Sum of `value_column` per distinct tuple of `group_columns`.
    /// Rows with a null in any group column are skipped; null values add nothing.
    pub fn group_sum_by(
        df: &DataFrame,
        group_columns: &[&str],
        value_column: &str,
    ) -> Result<AggregateResult, AggregateError> {
        for column in group_columns {
            Self::require(df, column)?;
        }
        Self::require(df, value_column)?;

        let measure = col(value_column).cast(DataType::Float64).sum();
        Self::ranked(df.clone().lazy(), group_columns, measure, value_column)
    }

    /// One entry per row keyed by `key_column`, without grouping.
    pub fn column_measure(
        df: &DataFrame,
        key_column: &str,
        value_column: &str,
    ) -> Result<AggregateResult, AggregateError> {
        Self::require(df, key_column)?;
        Self::require(df, value_column)?;
        let keys = text_values(df, key_column)?;
        let values = numeric_values(df, value_column)?;

        let entries = keys
            .into_iter()
            .zip(values)
            .filter_map(|(k, v)| {
                Some(AggregateEntry {
                    key: GroupKey::single(k?),
                    value: v?,
                })
            })
            .collect();
        Ok(AggregateResult::new(key_column, value_column, entries))
    }

    /// Per-group `sum(end_col) - sum(start_col)`, descending, first `top_k`.
    pub fn growth(
        df: &DataFrame,
        group_column: &str,
        start_col: &str,
        end_col: &str,
        top_k: usize,
    ) -> Result<AggregateResult, AggregateError> {
        Self::require(df, group_column)?;
        Self::require(df, start_col)?;
        Self::require(df, end_col)?;

        let as_number = |c: &str| col(c).cast(DataType::Float64).fill_null(lit(0.0));
        let delta = (as_number(end_col) - as_number(start_col)).sum();
        let measure = format!("{} - {}", end_col, start_col);
        Ok(Self::ranked(df.clone().lazy(), &[group_column], delta, &measure)?.top_n(top_k))
    }

    /// Year encoded as the leading integer token of a column label.
    pub fn year_from_label(label: &str) -> Result<i32, AggregateError> {
        label
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i32>().ok())
            .ok_or_else(|| AggregateError::InvalidYearLabel(label.to_string()))
    }

    /// One triple per (row, year column), all rows of a column before the next column.
    pub fn melt_wide_years(
        df: &DataFrame,
        id_column: &str,
        year_columns: &[&str],
    ) -> Result<Vec<MeltedTriple>, AggregateError> {
        Self::require(df, id_column)?;
        let years: Vec<i32> = year_columns
            .iter()
            .map(|label| {
                Self::require(df, label)?;
                Self::year_from_label(label)
            })
            .collect::<Result<_, _>>()?;

        let entities = text_values(df, id_column)?;
        let mut triples = Vec::with_capacity(df.height() * year_columns.len());

        for (label, year) in year_columns.iter().zip(years) {
            let values = numeric_values(df, label)?;
            for (entity, value) in entities.iter().zip(values) {
                triples.push(MeltedTriple {
                    entity: entity.clone().unwrap_or_default(),
                    year,
                    value,
                });
            }
        }
        Ok(triples)
    }

    /// Sum triples per (entity, year), sorted by entity then year.
    pub fn sum_melted(triples: &[MeltedTriple]) -> Result<Vec<MeltedTriple>, AggregateError> {
        let frame = DataFrame::new(vec![
            Column::new(
                MELT_ENTITY.into(),
                triples.iter().map(|t| t.entity.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                MELT_YEAR.into(),
                triples.iter().map(|t| t.year).collect::<Vec<_>>(),
            ),
            Column::new(
                MELT_VALUE.into(),
                triples.iter().map(|t| t.value).collect::<Vec<_>>(),
            ),
        ])?;
        let out = frame
            .lazy()
            .group_by([col(MELT_ENTITY), col(MELT_YEAR)])
            .agg([col(MELT_VALUE).sum()])
            .sort([MELT_ENTITY, MELT_YEAR], SortMultipleOptions::default())
            .collect()?;

        let entities = text_values(&out, MELT_ENTITY)?;
        let years: Vec<Option<i32>> = out.column(MELT_YEAR)?.i32()?.into_iter().collect();
        let values = numeric_values(&out, MELT_VALUE)?;
        Ok(entities
            .into_iter()
            .zip(years)
            .zip(values)
            .map(|((entity, year), value)| MeltedTriple {
                entity: entity.unwrap_or_default(),
                year: year.unwrap_or_default(),
                value: Some(value.unwrap_or(0.0)),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pairs: &[(&str, f64)]) -> AggregateResult {
        AggregateResult::new(
            "key",
            "value",
            pairs
                .iter()
                .map(|(k, v)| AggregateEntry {
                    key: GroupKey::single(*k),
                    value: *v,
                })
                .collect(),
        )
    }

    #[test]
    fn test_value_counts_example() {
        let df = df!("type" => &["Movie", "Movie", "TV Show"]).unwrap();
        let counts = Aggregator::value_counts(&df, "type").unwrap();
        assert_eq!(counts.labels(), vec!["Movie", "TV Show"]);
        assert_eq!(counts.values(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_value_counts_ties_first_encountered() {
        let df = df!("country" => &[Some("Japan"), Some("India"), None, Some("India"), Some("Japan"), Some("Spain")]).unwrap();
        let counts = Aggregator::value_counts(&df, "country").unwrap();
        assert_eq!(counts.labels(), vec!["Japan", "India", "Spain"]);
        // counts sum to rows minus nulls
        assert_eq!(counts.total(), 5.0);
    }

    #[test]
    fn test_value_counts_missing_column() {
        let df = df!("type" => &["Movie"]).unwrap();
        assert!(matches!(
            Aggregator::value_counts(&df, "rating"),
            Err(AggregateError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_value_counts_numeric_column() {
        let df = df!("year_added" => &[Some(2021), Some(2019), Some(2021), None]).unwrap();
        let yearly = Aggregator::value_counts(&df, "year_added").unwrap().sort_by_key();
        assert_eq!(yearly.labels(), vec!["2019", "2021"]);
        assert_eq!(yearly.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_value_counts_exploded_skips_null_lists() {
        let df = df!("listed_in" => &[Some("Dramas, Comedies"), None, Some("Comedies"), Some("Dramas")]).unwrap();
        let df = crate::data::DataCleaner::split_field(&df, "listed_in", ",", "genres").unwrap();
        let genres = Aggregator::value_counts_exploded(&df, "genres").unwrap();
        // tied counts keep first-encountered order
        assert_eq!(genres.labels(), vec!["Dramas", "Comedies"]);
        assert_eq!(genres.values(), vec![2.0, 2.0]);
        assert_eq!(genres.key_label, "genres");
    }

    #[test]
    fn test_group_sum_ties_first_encountered() {
        let df = df!(
            "Country/Territory" => &["Tonga", "Nauru", "Tuvalu", "Nauru"],
            "Area (km²)" => &[21.0, 10.0, 26.0, 11.0]
        )
        .unwrap();
        let sums = Aggregator::group_sum(&df, "Country/Territory", "Area (km²)").unwrap();
        assert_eq!(sums.labels(), vec!["Tuvalu", "Tonga", "Nauru"]);
        assert_eq!(sums.values(), vec![26.0, 21.0, 21.0]);
    }

    #[test]
    fn test_sum_melted_all_null_group_is_zero() {
        let triples = vec![
            MeltedTriple {
                entity: "Oceania".to_string(),
                year: 1970,
                value: None,
            },
            MeltedTriple {
                entity: "Asia".to_string(),
                year: 1970,
                value: Some(2.5),
            },
        ];
        let summed = Aggregator::sum_melted(&triples).unwrap();
        assert_eq!(summed[0].entity, "Asia");
        assert_eq!(summed[1].value, Some(0.0));
        assert!(Aggregator::sum_melted(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_key_is_numeric() {
        let r = result(&[("10", 1.0), ("9", 5.0), ("100", 3.0)]).sort_by_key();
        assert_eq!(r.labels(), vec!["9", "10", "100"]);
    }

    #[test]
    fn test_group_sum() {
        let df = df!(
            "Continent" => &["Asia", "Europe", "Asia", "Africa"],
            "World Population Percentage" => &[Some(17.88), Some(0.5), Some(17.85), None]
        )
        .unwrap();
        let sums = Aggregator::group_sum(&df, "Continent", "World Population Percentage").unwrap();
        assert_eq!(sums.labels(), vec!["Asia", "Europe", "Africa"]);
        assert!((sums.get("Asia").unwrap() - 35.73).abs() < 1e-9);
        assert_eq!(sums.get("Africa"), Some(0.0));
    }

    #[test]
    fn test_group_sum_by_tuple_key() {
        let df = df!(
            "type" => &["Movie", "Movie", "TV Show"],
            "rating" => &["PG", "PG", "PG"],
            "duration" => &[90.0, 100.0, 2.0]
        )
        .unwrap();
        let sums = Aggregator::group_sum_by(&df, &["type", "rating"], "duration").unwrap();
        assert_eq!(sums.entries[0].key.parts(), &["Movie".to_string(), "PG".to_string()]);
        assert_eq!(sums.labels(), vec!["Movie, PG", "TV Show, PG"]);
        assert_eq!(sums.key_label, "type, rating");
    }

    #[test]
    fn test_top_n_is_prefix() {
        let r = result(&[("a", 5.0), ("b", 4.0), ("c", 3.0)]);
        assert_eq!(r.top_n(2).labels(), vec!["a", "b"]);
        assert_eq!(r.top_n(10), r);
        assert!(r.top_n(0).is_empty());
    }

    #[test]
    fn test_bottom_n_keeps_order() {
        let r = result(&[("a", 5.0), ("b", 4.0), ("c", 3.0)]);
        assert_eq!(r.bottom_n(2).labels(), vec!["b", "c"]);
        assert_eq!(r.bottom_n(7).len(), 3);
    }

    #[test]
    fn test_percentage_share_sums_to_hundred() {
        let r = result(&[("Movie", 6126.0), ("TV Show", 2664.0), ("Other", 3.0)]);
        let share = r.percentage_share();
        assert!((share.total() - 100.0).abs() < 1e-9);
        assert_eq!(share.labels(), r.labels());
    }

    #[test]
    fn test_percentage_share_zero_total() {
        let share = result(&[("a", 0.0), ("b", 0.0)]).percentage_share();
        assert_eq!(share.values(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_growth_example() {
        let df = df!(
            "group" => &["X", "Y"],
            "col1" => &[10.0, 5.0],
            "col2" => &[15.0, 20.0]
        )
        .unwrap();
        let g = Aggregator::growth(&df, "group", "col1", "col2", 8).unwrap();
        assert_eq!(g.labels(), vec!["Y", "X"]);
        assert_eq!(g.values(), vec![15.0, 5.0]);
        assert_eq!(Aggregator::growth(&df, "group", "col1", "col2", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_column_measure_skips_nulls() {
        let df = df!(
            "Country/Territory" => &[Some("Moldova"), Some("Poland"), None],
            "Growth Rate" => &[Some(0.98), Some(1.02), Some(1.5)]
        )
        .unwrap();
        let m = Aggregator::column_measure(&df, "Country/Territory", "Growth Rate").unwrap();
        assert_eq!(m.labels(), vec!["Poland", "Moldova"]);
    }

    #[test]
    fn test_year_from_label() {
        assert_eq!(Aggregator::year_from_label("2022 Population").unwrap(), 2022);
        assert!(matches!(
            Aggregator::year_from_label("Population"),
            Err(AggregateError::InvalidYearLabel(_))
        ));
    }

    #[test]
    fn test_melt_wide_years_counts_and_order() {
        let df = df!(
            "Continent" => &["Asia", "Europe", "Asia"],
            "2022 Population" => &[Some(30.0), Some(20.0), None],
            "1970 Population" => &[10.0, 15.0, 5.0]
        )
        .unwrap();
        let triples =
            Aggregator::melt_wide_years(&df, "Continent", &["2022 Population", "1970 Population"]).unwrap();
        assert_eq!(triples.len(), 3 * 2);
        assert_eq!(
            triples[0],
            MeltedTriple {
                entity: "Asia".to_string(),
                year: 2022,
                value: Some(30.0)
            }
        );
        assert_eq!(triples[2].value, None);
        assert_eq!(triples[3].year, 1970);

        let summed = Aggregator::sum_melted(&triples).unwrap();
        let asia: Vec<(i32, Option<f64>)> = summed
            .iter()
            .filter(|t| t.entity == "Asia")
            .map(|t| (t.year, t.value))
            .collect();
        assert_eq!(asia, vec![(1970, Some(15.0)), (2022, Some(30.0))]);
        assert_eq!(summed.len(), 4);
    }

    #[test]
    fn test_melt_rejects_bad_label() {
        let df = df!("Continent" => &["Asia"], "Area (km²)" => &[1.0]).unwrap();
        assert!(matches!(
            Aggregator::melt_wide_years(&df, "Continent", &["Area (km²)"]),
            Err(AggregateError::InvalidYearLabel(_))
        ));
    }

    #[test]
    fn test_display_lists_entries() {
        let text = result(&[("Movie", 2.0), ("TV Show", 1.0)]).to_string();
        assert!(text.starts_with("key\n"));
        assert!(text.contains("Movie      2"));
        assert!(text.ends_with("Name: value, Length: 2"));
    }
}
