//! World population analysis: continents, yearly trends, growth, land area.

use crate::charts::{BarFill, ChartLabels, ChartRenderer, NamedSeries, Panel, PanelData};
use crate::config::AnalysisConfig;
use crate::data::{DataCleaner, DataLoader};
use crate::pipelines::{print_missing, print_section, PipelineError};
use crate::stats::{AggregateResult, Aggregator, MeltedTriple};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;

pub const COUNTRY: &str = "Country/Territory";
pub const CONTINENT: &str = "Continent";
pub const AREA: &str = "Area (km²)";
pub const GROWTH_RATE: &str = "Growth Rate";
pub const WORLD_SHARE: &str = "World Population Percentage";
pub const AREA_PER_PERSON: &str = "Area per Person";
pub const POPULATION_1970: &str = "1970 Population";
pub const POPULATION_2020: &str = "2020 Population";
pub const POPULATION_2022: &str = "2022 Population";

pub const YEAR_COLUMNS: [&str; 8] = [
    "2022 Population",
    "2020 Population",
    "2015 Population",
    "2010 Population",
    "2000 Population",
    "1990 Population",
    "1980 Population",
    "1970 Population",
];

const DROPPED_COLUMNS: [&str; 2] = ["CCA3", "Capital"];
const TOP_POPULATED: usize = 8;
const GROWTH_RATE_COUNT: usize = 6;
const LAND_COUNT: usize = 5;

/// Everything the population run prints and plots.
#[derive(Debug, Clone)]
pub struct PopulationSummary {
    pub missing: Vec<(String, usize)>,
    pub duplicates: usize,
    pub countries_by_continent: AggregateResult,
    pub continent_share: AggregateResult,
    pub continent_trend: Vec<MeltedTriple>,
    pub population_1970: AggregateResult,
    pub population_2020: AggregateResult,
    pub growth: AggregateResult,
    pub top_populated_1970: AggregateResult,
    pub top_populated_2022: AggregateResult,
    pub fastest_growing: AggregateResult,
    pub slowest_growing: AggregateResult,
    /// Per-country yearly populations, one triple per (country, year column).
    pub country_trend: Vec<MeltedTriple>,
    pub most_land: AggregateResult,
    pub least_land: AggregateResult,
    pub most_land_per_person: AggregateResult,
    pub least_land_per_person: AggregateResult,
}

pub fn clean(raw: &DataFrame) -> Result<DataFrame, PipelineError> {
    let df = DataCleaner::drop_columns(raw, &DROPPED_COLUMNS)?;
    let df = DataCleaner::derive_ratio(&df, AREA, POPULATION_2022, AREA_PER_PERSON)?;
    Ok(df)
}

pub fn analyze(raw: &DataFrame) -> Result<PopulationSummary, PipelineError> {
    let missing = DataCleaner::missing_values(raw);
    let duplicates = DataCleaner::duplicate_count(raw)?;
    let df = clean(raw)?;
    info!("population table: {} countries, {} duplicates", df.height(), duplicates);

    let continent_rows = Aggregator::melt_wide_years(&df, CONTINENT, &YEAR_COLUMNS)?;
    let growth_rates = Aggregator::column_measure(&df, COUNTRY, GROWTH_RATE)?;
    let land = Aggregator::group_sum(&df, COUNTRY, AREA)?;
    let land_per_person = Aggregator::group_sum(&df, COUNTRY, AREA_PER_PERSON)?;

    Ok(PopulationSummary {
        missing,
        duplicates,
        countries_by_continent: Aggregator::value_counts(&df, CONTINENT)?,
        continent_share: Aggregator::group_sum(&df, CONTINENT, WORLD_SHARE)?,
        continent_trend: Aggregator::sum_melted(&continent_rows)?,
        population_1970: Aggregator::group_sum(&df, COUNTRY, POPULATION_1970)?,
        population_2020: Aggregator::group_sum(&df, COUNTRY, POPULATION_2020)?,
        growth: Aggregator::growth(&df, COUNTRY, POPULATION_1970, POPULATION_2022, TOP_POPULATED)?,
        top_populated_1970: Aggregator::group_sum(&df, COUNTRY, POPULATION_1970)?.top_n(TOP_POPULATED),
        top_populated_2022: Aggregator::group_sum(&df, COUNTRY, POPULATION_2022)?.top_n(TOP_POPULATED),
        fastest_growing: growth_rates.top_n(GROWTH_RATE_COUNT),
        slowest_growing: growth_rates.bottom_n(GROWTH_RATE_COUNT),
        country_trend: Aggregator::melt_wide_years(&df, COUNTRY, &YEAR_COLUMNS)?,
        most_land: land.top_n(LAND_COUNT),
        least_land: land.bottom_n(LAND_COUNT),
        most_land_per_person: land_per_person.top_n(LAND_COUNT),
        least_land_per_person: land_per_person.bottom_n(LAND_COUNT),
    })
}

/// One line panel per country named in `countries`, in that order.
pub fn trend_panels(trend: &[MeltedTriple], countries: &AggregateResult) -> Vec<Panel> {
    countries
        .labels()
        .into_iter()
        .map(|country| {
            let rows: Vec<MeltedTriple> = trend
                .iter()
                .filter(|t| t.entity == country)
                .cloned()
                .collect();
            Panel {
                title: country,
                data: PanelData::Lines(NamedSeries::from_triples(&rows)),
                fill: BarFill::Palette,
            }
        })
        .collect()
}

fn bar_pair(
    left_title: &str,
    left: &AggregateResult,
    right_title: &str,
    right: &AggregateResult,
    first_color: usize,
) -> Vec<Panel> {
    vec![
        Panel {
            title: left_title.to_string(),
            data: PanelData::Bars(left.clone()),
            fill: BarFill::Single(first_color),
        },
        Panel {
            title: right_title.to_string(),
            data: PanelData::Bars(right.clone()),
            fill: BarFill::Single(first_color + 1),
        },
    ]
}

pub fn print_summary(summary: &PopulationSummary) {
    print_missing("Missing values", &summary.missing);
    println!("Amount of duplicates: {}\n", summary.duplicates);
    print_section("Number of Countries by Continent", &summary.countries_by_continent);
    print_section("Fastest growing countries", &summary.fastest_growing);
    print_section("Slowest growing countries", &summary.slowest_growing);
}

pub fn render(
    summary: &PopulationSummary,
    renderer: &ChartRenderer,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut written = Vec::new();

    written.push(renderer.bar(
        &summary.countries_by_continent,
        &ChartLabels::new("Number of Countries by Continent").axes("Continents", "Number of Countries"),
    )?);
    written.push(renderer.pie(
        &summary.continent_share,
        &ChartLabels::new("World Population Percentage by Continent"),
    )?);
    written.push(renderer.line(
        &NamedSeries::from_triples(&summary.continent_trend),
        &ChartLabels::new("Population Trends by Continent Over Time").axes("Year", "Population"),
    )?);

    for (feature, data) in [
        (POPULATION_1970, &summary.population_1970),
        (POPULATION_2020, &summary.population_2020),
    ] {
        written.push(renderer.choropleth(data, &ChartLabels::new(feature))?);
    }

    written.push(renderer.bar(
        &summary.growth,
        &ChartLabels::new("Growth Of Population From 1970 to 2022 (Top 8)")
            .axes("Country", "Population Growth")
            .fill(BarFill::Gradient),
    )?);
    for (year, data) in [
        ("1970", &summary.top_populated_1970),
        ("2022", &summary.top_populated_2022),
    ] {
        written.push(renderer.bar(
            data,
            &ChartLabels::new(format!("Top 8 Most Populated Countries ({})", year))
                .axes("Country", "Population")
                .fill(BarFill::Gradient),
        )?);
    }

    let trend_labels = |title: &str| ChartLabels::new(title).axes("Year", "Population");
    written.push(renderer.grouped_subplot(
        &trend_panels(&summary.country_trend, &summary.fastest_growing),
        &trend_labels("Population Trends of Fastest Growing Countries Over Time"),
    )?);
    written.push(renderer.grouped_subplot(
        &trend_panels(&summary.country_trend, &summary.slowest_growing),
        &trend_labels("Population Trends of Slowest Growing Countries Over Time"),
    )?);

    written.push(renderer.grouped_subplot(
        &bar_pair(
            "Countries with Most Land",
            &summary.most_land,
            "Countries with Least Land",
            &summary.least_land,
            0,
        ),
        &ChartLabels::new("Geographical Distribution of Land Area by Country").axes("", AREA),
    )?);
    written.push(renderer.grouped_subplot(
        &bar_pair(
            "Countries with Most Land Available Per Capita",
            &summary.most_land_per_person,
            "Countries with Least Land Available Per Capita",
            &summary.least_land_per_person,
            2,
        ),
        &ChartLabels::new("Distribution of Available Land Area by Country Per Capita")
            .axes("", "Land Available Per Person"),
    )?);
    Ok(written)
}

/// Load, analyze, print and render the population table.
pub fn run(config: &AnalysisConfig) -> Result<(), PipelineError> {
    let raw = DataLoader::load_csv(&config.population_csv)?;
    let summary = analyze(&raw)?;
    print_summary(&summary);

    let renderer = ChartRenderer::new(config.style.clone(), &config.chart_dir, config.open_charts);
    let charts = render(&summary, &renderer)?;
    info!("{} population charts written to {}", charts.len(), renderer.output_dir().display());
    Ok(())
}
