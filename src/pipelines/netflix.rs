//! Streaming catalog analysis: content types, genres, yearly additions,
//! directors, countries and a word cloud of movie titles.

use crate::charts::{BarFill, ChartLabels, ChartRenderer, NamedSeries};
use crate::config::AnalysisConfig;
use crate::data::{export_csv, text_values, DataCleaner, DataLoader};
use crate::pipelines::{print_missing, print_section, PipelineError};
use crate::stats::{AggregateResult, Aggregator};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;

pub const TYPE: &str = "type";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const COUNTRY: &str = "country";
pub const DATE_ADDED: &str = "date_added";
pub const LISTED_IN: &str = "listed_in";
pub const GENRES: &str = "genres";
pub const YEAR_ADDED: &str = "year_added";
pub const MONTH_ADDED: &str = "month_added";

pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";

const DROPPED_COLUMNS: [&str; 1] = ["show_id"];
const GENRE_DELIMITER: &str = ",";

/// Everything the catalog run prints and plots.
#[derive(Debug, Clone)]
pub struct NetflixSummary {
    pub missing_before: Vec<(String, usize)>,
    pub duplicates_removed: usize,
    pub type_counts: AggregateResult,
    pub top_genres: AggregateResult,
    pub yearly_content: AggregateResult,
    pub top_directors: AggregateResult,
    pub movie_categories: AggregateResult,
    pub tv_categories: AggregateResult,
    pub yearly_movies: AggregateResult,
    pub yearly_tv_shows: AggregateResult,
    pub top_countries: AggregateResult,
    /// Directors ranked without the placeholder value.
    pub leading_directors: AggregateResult,
    pub movie_titles: String,
}

pub struct NetflixAnalysis {
    pub cleaned: DataFrame,
    pub summary: NetflixSummary,
}

/// Deduplicate, drop the id column, parse dates, split genres, derive year/month.
pub fn clean(raw: &DataFrame) -> Result<DataFrame, PipelineError> {
    let df = DataCleaner::drop_duplicates(raw)?;
    let df = DataCleaner::drop_columns(&df, &DROPPED_COLUMNS)?;
    let df = DataCleaner::parse_date(&df, DATE_ADDED)?;
    let df = DataCleaner::split_field(&df, LISTED_IN, GENRE_DELIMITER, GENRES)?;
    let df = DataCleaner::derive_year_month(&df, DATE_ADDED, YEAR_ADDED, MONTH_ADDED)?;
    Ok(df)
}

pub fn analyze(raw: &DataFrame, config: &AnalysisConfig) -> Result<NetflixAnalysis, PipelineError> {
    let missing_before = DataCleaner::missing_values(raw);
    let cleaned = clean(raw)?;
    let duplicates_removed = raw.height() - cleaned.height();
    info!("catalog cleaned: {} rows ({} duplicates removed)", cleaned.height(), duplicates_removed);

    let movies = DataCleaner::filter_eq(&cleaned, TYPE, MOVIE)?;
    let tv_shows = DataCleaner::filter_eq(&cleaned, TYPE, TV_SHOW)?;

    let directors = Aggregator::value_counts(&cleaned, DIRECTOR)?;
    let movie_titles = text_values(&movies, TITLE)?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let summary = NetflixSummary {
        missing_before,
        duplicates_removed,
        type_counts: Aggregator::value_counts(&cleaned, TYPE)?,
        top_genres: Aggregator::value_counts_exploded(&cleaned, GENRES)?.top_n(10),
        yearly_content: Aggregator::value_counts(&cleaned, YEAR_ADDED)?.sort_by_key(),
        top_directors: directors.top_n(10),
        movie_categories: Aggregator::value_counts(&movies, LISTED_IN)?.top_n(10),
        tv_categories: Aggregator::value_counts(&tv_shows, LISTED_IN)?.top_n(10),
        yearly_movies: Aggregator::value_counts(&movies, YEAR_ADDED)?.sort_by_key(),
        yearly_tv_shows: Aggregator::value_counts(&tv_shows, YEAR_ADDED)?.sort_by_key(),
        top_countries: Aggregator::value_counts(&cleaned, COUNTRY)?.top_n(10),
        leading_directors: directors.without(&config.director_placeholder).top_n(15),
        movie_titles,
    };
    Ok(NetflixAnalysis { cleaned, summary })
}

pub fn print_summary(summary: &NetflixSummary) {
    print_missing("Missing values before cleaning", &summary.missing_before);
    println!("Duplicates removed: {}\n", summary.duplicates_removed);
    print_section("Content Type Distribution", &summary.type_counts);
    print_section("Top 10 Genres", &summary.top_genres);
    print_section("Content Added Over Time", &summary.yearly_content);
    print_section("Top 10 Directors", &summary.top_directors);
}

pub fn render(summary: &NetflixSummary, renderer: &ChartRenderer) -> Result<Vec<PathBuf>, PipelineError> {
    let single = BarFill::Single(3);
    let mut written = Vec::new();

    written.push(renderer.bar(
        &summary.type_counts,
        &ChartLabels::new("Distribution of Content by Type")
            .axes("Type", "Count")
            .fill(BarFill::Gradient),
    )?);
    written.push(renderer.pie(
        &summary.type_counts,
        &ChartLabels::new("Distribution of Content by Type (Pie Chart)"),
    )?);
    written.push(renderer.bar(
        &summary.top_genres,
        &ChartLabels::new("Top 10 Genres").axes("Genre", "Count").fill(single),
    )?);
    written.push(renderer.bar(
        &summary.movie_categories,
        &ChartLabels::new("Top 10 popular genres for movies on Netflix")
            .axes("Genres", "Movies Frequency")
            .fill(single),
    )?);
    written.push(renderer.bar(
        &summary.tv_categories,
        &ChartLabels::new("Top 10 popular genres for TV Shows on Netflix")
            .axes("Genres", "TV Shows Frequency")
            .fill(single),
    )?);

    let yearly = vec![
        NamedSeries::from_aggregate("Movies", &summary.yearly_movies),
        NamedSeries::from_aggregate("TV Shows", &summary.yearly_tv_shows),
    ];
    written.push(renderer.line(
        &yearly,
        &ChartLabels::new("Yearly releases of Movies and TV Shows on Netflix")
            .axes("Years", "Frequency of releases"),
    )?);

    written.push(renderer.bar(
        &summary.top_countries,
        &ChartLabels::new("Top 10 countries with most content on Netflix")
            .axes("Country", "Frequency")
            .fill(single),
    )?);
    written.push(renderer.bar(
        &summary.leading_directors,
        &ChartLabels::new("Top 15 directors across Netflix with high frequency of movies and shows")
            .axes("Director", "Count")
            .fill(single),
    )?);
    written.push(renderer.word_cloud(
        &summary.movie_titles,
        &ChartLabels::new("Word Cloud of Movie Titles"),
    )?);
    Ok(written)
}

/// Load, analyze, print, export and render the catalog.
pub fn run(config: &AnalysisConfig) -> Result<(), PipelineError> {
    let raw = DataLoader::load_csv(&config.netflix_csv)?;
    let analysis = analyze(&raw, config)?;
    print_summary(&analysis.summary);
    export_csv(&analysis.cleaned, &config.cleaned_netflix_csv)?;

    let renderer = ChartRenderer::new(config.style.clone(), &config.chart_dir, config.open_charts);
    let charts = render(&analysis.summary, &renderer)?;
    info!("{} catalog charts written to {}", charts.len(), renderer.output_dir().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> DataFrame {
        df!(
            "show_id" => &["s1", "s2", "s2", "s3", "s4"],
            "type" => &["Movie", "TV Show", "TV Show", "Movie", "Movie"],
            "title" => &["Love Actually", "Love Island", "Love Island", "Dead Love", "Night Run"],
            "director" => &["Not Given", "Ava", "Ava", "Not Given", "Ava"],
            "country" => &["United States", "India", "India", "India", "Japan"],
            "date_added" => &["9/25/2021", "1/1/2020", "1/1/2020", "bad", "3/5/2021"],
            "listed_in" => &["Dramas, Comedies", "Reality TV", "Reality TV", "Dramas", "Dramas"]
        )
        .unwrap()
    }

    #[test]
    fn test_clean_schema() {
        let cleaned = clean(&catalog()).unwrap();
        assert_eq!(cleaned.height(), 4);
        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert!(!names.contains(&"show_id".to_string()));
        assert_eq!(&names[names.len() - 3..], &[GENRES, YEAR_ADDED, MONTH_ADDED]);
    }

    #[test]
    fn test_analyze_summary() {
        let analysis = analyze(&catalog(), &AnalysisConfig::default()).unwrap();
        let s = &analysis.summary;
        assert_eq!(s.duplicates_removed, 1);
        assert_eq!(s.type_counts.labels(), vec!["Movie", "TV Show"]);
        assert_eq!(s.type_counts.values(), vec![3.0, 1.0]);
        assert_eq!(s.top_genres.labels()[0], "Dramas");
        assert_eq!(s.top_genres.get("Dramas"), Some(3.0));
        assert_eq!(s.yearly_content.labels(), vec!["2020", "2021"]);
        assert_eq!(s.yearly_movies.values(), vec![2.0]);
        assert_eq!(s.top_countries.labels(), vec!["India", "United States", "Japan"]);
        // equal counts keep first-encountered order
        assert_eq!(s.top_directors.labels(), vec!["Not Given", "Ava"]);
        assert_eq!(s.leading_directors.labels(), vec!["Ava"]);
        assert_eq!(s.movie_titles, "Love Actually Dead Love Night Run");
    }
}
