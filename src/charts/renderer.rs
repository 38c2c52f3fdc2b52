//! Static Chart Renderer
//! Draws aggregates, year series and free text as PNG charts with plotters.
//!
//! Supported kinds:
//! - Bar: one bar per aggregate entry, value printed above each bar
//! - Pie: slices labelled with their percentage share
//! - Line: one line per named series over integer years
//! - Choropleth: one tile per entity, filled from the viridis scale
//! - WordCloud: word frequencies placed on a spiral over a black canvas
//! - GroupedSubplot: a two-column grid of bar or line panels under one title

use crate::charts::style::{compact_number, normalize, viridis, ChartStyle};
use crate::charts::wordcloud::{layout_words, word_frequencies, CLOUD_HEIGHT, CLOUD_WIDTH};
use crate::stats::{AggregateResult, MeltedTriple};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Panels per row in a grouped subplot.
const SUBPLOT_COLUMNS: usize = 2;
/// Height of the title strip above a word cloud.
const CLOUD_HEADER: u32 = 40;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("{kind:?} chart cannot be drawn from {input}")]
    UnsupportedInput { kind: ChartKind, input: &'static str },
    #[error("Nothing to plot for '{0}'")]
    EmptyData(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Choropleth,
    WordCloud,
    GroupedSubplot,
}

/// How bars are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarFill {
    /// Cycle through the palette, one colour per bar.
    #[default]
    Palette,
    /// Every bar uses the palette colour at this index.
    Single(usize),
    /// Colour by value on the viridis scale.
    Gradient,
}

/// Title, axis captions and bar colouring of one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub fill: BarFill,
}

impl ChartLabels {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn fill(mut self, fill: BarFill) -> Self {
        self.fill = fill;
        self
    }
}

/// A named line of `(year, value)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

impl NamedSeries {
    /// One series per entity (first-encountered order), points sorted by year.
    /// Triples without a value are skipped.
    pub fn from_triples(triples: &[MeltedTriple]) -> Vec<NamedSeries> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut series: Vec<NamedSeries> = Vec::new();
        for t in triples {
            let Some(value) = t.value else {
                continue;
            };
            let i = *index.entry(t.entity.as_str()).or_insert_with(|| {
                series.push(NamedSeries {
                    name: t.entity.clone(),
                    points: Vec::new(),
                });
                series.len() - 1
            });
            series[i].points.push((t.year, value));
        }
        for s in &mut series {
            s.points.sort_by_key(|(year, _)| *year);
        }
        series
    }

    /// A series from an aggregate keyed by year. Keys that are not integers are skipped.
    pub fn from_aggregate(name: &str, data: &AggregateResult) -> NamedSeries {
        let mut points: Vec<(i32, f64)> = data
            .entries
            .iter()
            .filter_map(|e| e.key.to_string().parse::<i32>().ok().map(|year| (year, e.value)))
            .collect();
        points.sort_by_key(|(year, _)| *year);
        NamedSeries {
            name: name.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PanelData {
    Bars(AggregateResult),
    Lines(Vec<NamedSeries>),
}

/// One cell of a grouped subplot.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub data: PanelData,
    pub fill: BarFill,
}

impl Panel {
    fn is_empty(&self) -> bool {
        match &self.data {
            PanelData::Bars(data) => data.is_empty(),
            PanelData::Lines(series) => series.iter().all(|s| s.points.is_empty()),
        }
    }
}

/// What a chart is drawn from.
#[derive(Debug, Clone, Copy)]
pub enum ChartInput<'a> {
    Aggregate(&'a AggregateResult),
    Series(&'a [NamedSeries]),
    Text(&'a str),
    Panels(&'a [Panel]),
}

impl ChartInput<'_> {
    fn describe(&self) -> &'static str {
        match self {
            ChartInput::Aggregate(_) => "an aggregate",
            ChartInput::Series(_) => "line series",
            ChartInput::Text(_) => "raw text",
            ChartInput::Panels(_) => "subplot panels",
        }
    }
}

/// File-name friendly form of a chart title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "chart".to_string()
    } else {
        slug.to_string()
    }
}

/// Columns and rows of a tile grid holding `n` tiles on a `width` x `height` canvas.
pub fn tile_grid(n: usize, width: u32, height: u32) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let aspect = width as f64 / height.max(1) as f64;
    let cols = ((n as f64 * aspect).sqrt().ceil() as usize).clamp(1, n);
    (cols, n.div_ceil(cols))
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Renders charts into PNG files under an output directory.
pub struct ChartRenderer {
    style: ChartStyle,
    output_dir: PathBuf,
    open_charts: bool,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle, output_dir: impl Into<PathBuf>, open_charts: bool) -> Self {
        Self {
            style,
            output_dir: output_dir.into(),
            open_charts,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Draw `input` as a `kind` chart and return the written file.
    pub fn render(
        &self,
        kind: ChartKind,
        input: ChartInput<'_>,
        labels: &ChartLabels,
    ) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.png", slugify(&labels.title)));

        match (kind, input) {
            (ChartKind::Bar, ChartInput::Aggregate(data)) => self.render_bar(&path, data, labels)?,
            (ChartKind::Pie, ChartInput::Aggregate(data)) => self.render_pie(&path, data, labels)?,
            (ChartKind::Choropleth, ChartInput::Aggregate(data)) => {
                self.render_choropleth(&path, data, labels)?
            }
            (ChartKind::Line, ChartInput::Series(series)) => {
                self.render_line(&path, series, labels)?
            }
            (ChartKind::WordCloud, ChartInput::Text(text)) => {
                self.render_word_cloud(&path, text, labels)?
            }
            (ChartKind::GroupedSubplot, ChartInput::Panels(panels)) => {
                self.render_grouped(&path, panels, labels)?
            }
            (kind, input) => {
                return Err(RenderError::UnsupportedInput {
                    kind,
                    input: input.describe(),
                })
            }
        }

        info!("{:?} chart '{}' -> {}", kind, labels.title, path.display());
        if self.open_charts {
            if let Err(e) = open::that(&path) {
                warn!("could not open {}: {}", path.display(), e);
            }
        }
        Ok(path)
    }

    pub fn bar(&self, data: &AggregateResult, labels: &ChartLabels) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::Bar, ChartInput::Aggregate(data), labels)
    }

    pub fn pie(&self, data: &AggregateResult, labels: &ChartLabels) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::Pie, ChartInput::Aggregate(data), labels)
    }

    pub fn line(&self, series: &[NamedSeries], labels: &ChartLabels) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::Line, ChartInput::Series(series), labels)
    }

    pub fn choropleth(
        &self,
        data: &AggregateResult,
        labels: &ChartLabels,
    ) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::Choropleth, ChartInput::Aggregate(data), labels)
    }

    pub fn word_cloud(&self, text: &str, labels: &ChartLabels) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::WordCloud, ChartInput::Text(text), labels)
    }

    pub fn grouped_subplot(
        &self,
        panels: &[Panel],
        labels: &ChartLabels,
    ) -> Result<PathBuf, RenderError> {
        self.render(ChartKind::GroupedSubplot, ChartInput::Panels(panels), labels)
    }

    fn render_bar(
        &self,
        path: &Path,
        data: &AggregateResult,
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }
        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        self.draw_bars(&root, data, labels)?;
        root.present()?;
        Ok(())
    }

    fn bar_color(&self, fill: BarFill, index: usize, value: f64, lo: f64, hi: f64) -> RGBColor {
        match fill {
            BarFill::Palette => self.style.palette_color(index),
            BarFill::Single(i) => self.style.palette_color(i),
            BarFill::Gradient => viridis(normalize(value, lo, hi)),
        }
    }

    fn draw_bars(
        &self,
        area: &Canvas<'_>,
        data: &AggregateResult,
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        let names = data.labels();
        let values = data.values();
        let (lo, hi) = value_range(values.iter().copied());

        let top = hi.max(0.0);
        let bottom = lo.min(0.0);
        let headroom = if top > bottom { (top - bottom) * 0.1 } else { 1.0 };
        let y_start = if bottom < 0.0 { bottom - headroom } else { 0.0 };
        let y_range = y_start..top + headroom;

        // Long or many category names are drawn vertically
        let longest = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) as u32;
        let rotate = names.len() > 3 || longest > 14;
        let label_font = self.style.label_font();
        let (x_style, x_area) = if rotate {
            let size = longest * self.style.label_font_size * 6 / 10 + 20;
            (
                label_font.clone().transform(FontTransform::Rotate90),
                size.clamp(40, 220),
            )
        } else {
            (label_font.clone(), 40)
        };

        let mut chart = ChartBuilder::on(area)
            .caption(&labels.title, self.style.title_font())
            .margin(15)
            .x_label_area_size(x_area)
            .y_label_area_size(70)
            .build_cartesian_2d((0..names.len() as i32).into_segmented(), y_range)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len())
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v: &f64| compact_number(*v))
            .x_label_style(x_style)
            .y_label_style(label_font.clone())
            .axis_desc_style(label_font.clone())
            .x_desc(labels.x_label.as_str())
            .y_desc(labels.y_label.as_str())
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            let color = self.bar_color(labels.fill, i, *v, lo, hi);
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i as i32), 0.0),
                    (SegmentValue::Exact(i as i32 + 1), *v),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 5, 5);
            bar
        }))?;

        let value_style = label_font
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            Text::new(
                compact_number(*v),
                (SegmentValue::CenterOf(i as i32), *v),
                value_style.clone(),
            )
        }))?;
        Ok(())
    }

    fn render_pie(
        &self,
        path: &Path,
        data: &AggregateResult,
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        if data.is_empty() || data.total() <= 0.0 {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }
        let share = data.percentage_share();
        let sizes = share.values();
        let colors: Vec<RGBColor> = (0..sizes.len()).map(|i| self.style.palette_color(i)).collect();
        let slice_labels: Vec<String> = share
            .entries
            .iter()
            .map(|e| format!("{} ({:.1}%)", e.key, e.value))
            .collect();

        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(&labels.title, self.style.title_font())?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = w.min(h) as f64 * 0.35;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &slice_labels);
        pie.start_angle(-90.0);
        pie.label_style(self.style.label_font().color(&BLACK));
        area.draw(&pie)?;
        root.present()?;
        Ok(())
    }

    fn render_line(
        &self,
        path: &Path,
        series: &[NamedSeries],
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        if series.iter().all(|s| s.points.is_empty()) {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }
        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        self.draw_lines(&root, series, labels, true)?;
        root.present()?;
        Ok(())
    }

    fn draw_lines(
        &self,
        area: &Canvas<'_>,
        series: &[NamedSeries],
        labels: &ChartLabels,
        legend: bool,
    ) -> Result<(), RenderError> {
        let points = || series.iter().flat_map(|s| s.points.iter());
        let x_min = points().map(|(x, _)| *x).min().unwrap_or(0);
        let x_max = points().map(|(x, _)| *x).max().unwrap_or(0).max(x_min + 1);
        let (lo, hi) = value_range(points().map(|(_, y)| *y));
        let bottom = lo.min(0.0);
        let top = if hi > bottom { hi + (hi - bottom) * 0.05 } else { bottom + 1.0 };

        let label_font = self.style.label_font();
        let mut chart = ChartBuilder::on(area)
            .caption(&labels.title, self.style.title_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, bottom..top)?;

        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|x: &i32| x.to_string())
            .y_label_formatter(&|v: &f64| compact_number(*v))
            .label_style(label_font.clone())
            .axis_desc_style(label_font.clone())
            .x_desc(labels.x_label.as_str())
            .y_desc(labels.y_label.as_str())
            .draw()?;

        for (i, s) in series.iter().enumerate() {
            let color = self.style.palette_color(i);
            let drawn = chart.draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(3),
            ))?;
            if legend {
                drawn.label(s.name.clone()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
            }
        }

        if legend {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(label_font)
                .draw()?;
        }
        Ok(())
    }

    fn render_choropleth(
        &self,
        path: &Path,
        data: &AggregateResult,
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }
        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(&labels.title, self.style.title_font())?;
        let (w, _) = area.dim_in_pixel();
        let (map, scale) = area.split_horizontally(w.saturating_sub(110));

        let (mw, mh) = map.dim_in_pixel();
        let (cols, rows) = tile_grid(data.len(), mw, mh);
        let tile_w = (mw as usize / cols) as i32;
        let tile_h = (mh as usize / rows) as i32;
        let (lo, hi) = value_range(data.values().into_iter());
        debug!("choropleth grid {}x{} for {} entities", cols, rows, data.len());

        let name_size = (tile_h as f64 / 3.0).clamp(6.0, 12.0);
        let name_font = self.style.font(name_size);
        let max_chars = ((tile_w as f64 - 4.0) / (name_size * 0.6)).max(1.0) as usize;

        for (i, entry) in data.entries.iter().enumerate() {
            let x0 = (i % cols) as i32 * tile_w;
            let y0 = (i / cols) as i32 * tile_h;
            let t = normalize(entry.value, lo, hi);
            map.draw(&Rectangle::new(
                [(x0 + 1, y0 + 1), (x0 + tile_w - 1, y0 + tile_h - 1)],
                viridis(t).filled(),
            ))?;
            let text_color = if t > 0.6 { BLACK } else { WHITE };
            let name: String = entry.key.to_string().chars().take(max_chars).collect();
            map.draw(&Text::new(name, (x0 + 3, y0 + 3), name_font.color(&text_color)))?;
        }

        // Colour bar
        let (_, sh) = scale.dim_in_pixel();
        let (bar_top, bar_bottom) = (30i32, sh as i32 - 30);
        let steps = 100;
        let step_h = ((bar_bottom - bar_top) / steps).max(1);
        for s in 0..steps {
            let t = s as f64 / (steps - 1) as f64;
            let y1 = bar_bottom - s * step_h;
            scale.draw(&Rectangle::new(
                [(20, y1 - step_h), (45, y1)],
                viridis(t).filled(),
            ))?;
        }
        let scale_font = self.style.label_font();
        scale.draw(&Text::new(
            compact_number(hi),
            (50, bar_bottom - steps * step_h),
            scale_font.color(&BLACK),
        ))?;
        scale.draw(&Text::new(
            compact_number(lo),
            (50, bar_bottom - 12),
            scale_font.color(&BLACK),
        ))?;
        scale.draw(&Text::new(
            data.measure_label.clone(),
            (5, 5),
            scale_font.color(&BLACK),
        ))?;

        root.present()?;
        Ok(())
    }

    fn render_word_cloud(
        &self,
        path: &Path,
        text: &str,
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        let freqs = word_frequencies(text);
        if freqs.is_empty() {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }

        let root =
            BitMapBackend::new(path, (CLOUD_WIDTH, CLOUD_HEIGHT + CLOUD_HEADER)).into_drawing_area();
        root.fill(&WHITE)?;
        let (header, cloud) = root.split_vertically(CLOUD_HEADER);
        header.draw(&Text::new(
            labels.title.clone(),
            (CLOUD_WIDTH as i32 / 2, CLOUD_HEADER as i32 / 2),
            self.style
                .title_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
        cloud.fill(&BLACK)?;

        let placed = layout_words(&freqs, CLOUD_WIDTH, CLOUD_HEIGHT, |word, size| {
            cloud
                .estimate_text_size(word, &TextStyle::from(self.style.font(size)))
                .map_err(RenderError::from)
        })?;
        debug!("word cloud placed {} of {} words", placed.len(), freqs.len());

        for word in &placed {
            // Golden-ratio stepping spreads neighbouring ranks across the scale
            let color = viridis((word.rank as f64 * 0.618_034).fract());
            cloud.draw(&Text::new(
                word.word.clone(),
                (word.x, word.y),
                self.style.font(word.font_size).color(&color),
            ))?;
        }
        root.present()?;
        Ok(())
    }

    fn render_grouped(
        &self,
        path: &Path,
        panels: &[Panel],
        labels: &ChartLabels,
    ) -> Result<(), RenderError> {
        if panels.is_empty() {
            return Err(RenderError::EmptyData(labels.title.clone()));
        }
        if let Some(panel) = panels.iter().find(|p| p.is_empty()) {
            return Err(RenderError::EmptyData(panel.title.clone()));
        }

        let cols = panels.len().min(SUBPLOT_COLUMNS);
        let rows = panels.len().div_ceil(cols);
        let root = BitMapBackend::new(path, (self.style.width, self.style.height * rows as u32))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let body = root.titled(&labels.title, self.style.title_font())?;

        for (panel, area) in panels.iter().zip(body.split_evenly((rows, cols)).iter()) {
            let panel_labels = ChartLabels {
                title: panel.title.clone(),
                fill: panel.fill,
                ..labels.clone()
            };
            match &panel.data {
                PanelData::Bars(data) => self.draw_bars(area, data, &panel_labels)?,
                PanelData::Lines(series) => self.draw_lines(area, series, &panel_labels, false)?,
            }
        }
        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AggregateEntry, GroupKey};
    use tempfile::tempdir;

    fn triple(entity: &str, year: i32, value: Option<f64>) -> MeltedTriple {
        MeltedTriple {
            entity: entity.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Top 8 Most Populated Countries (2022)"),
            "top_8_most_populated_countries_2022"
        );
        assert_eq!(slugify("Area (km²)"), "area_km");
        assert_eq!(slugify("!!!"), "chart");
    }

    #[test]
    fn test_tile_grid_covers_all_tiles() {
        assert_eq!(tile_grid(0, 800, 600), (0, 0));
        assert_eq!(tile_grid(1, 800, 600), (1, 1));
        for n in [2usize, 7, 50, 234] {
            let (cols, rows) = tile_grid(n, 890, 560);
            assert!(cols * rows >= n);
            assert!(cols * (rows - 1) < n);
        }
    }

    #[test]
    fn test_series_from_triples() {
        let triples = vec![
            triple("Asia", 2022, Some(4.7)),
            triple("Europe", 2022, Some(0.7)),
            triple("Asia", 1970, Some(2.1)),
            triple("Europe", 1970, None),
        ];
        let series = NamedSeries::from_triples(&triples);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Asia");
        assert_eq!(series[0].points, vec![(1970, 2.1), (2022, 4.7)]);
        assert_eq!(series[1].points, vec![(2022, 0.7)]);
    }

    #[test]
    fn test_series_from_aggregate() {
        let yearly = AggregateResult::new(
            "year_added",
            "count",
            vec![
                AggregateEntry {
                    key: GroupKey::single("2021"),
                    value: 3.0,
                },
                AggregateEntry {
                    key: GroupKey::single("2019"),
                    value: 5.0,
                },
                AggregateEntry {
                    key: GroupKey::single("unknown"),
                    value: 9.0,
                },
            ],
        );
        let series = NamedSeries::from_aggregate("Movies", &yearly);
        assert_eq!(series.name, "Movies");
        assert_eq!(series.points, vec![(2019, 5.0), (2021, 3.0)]);
    }

    #[test]
    fn test_labels_builder() {
        let labels = ChartLabels::new("Distribution of Content by Type")
            .axes("Type", "Count")
            .fill(BarFill::Gradient);
        assert_eq!(labels.x_label, "Type");
        assert_eq!(labels.y_label, "Count");
        assert_eq!(labels.fill, BarFill::Gradient);
    }

    #[test]
    fn test_kind_input_mismatch() {
        let dir = tempdir().unwrap();
        let renderer = ChartRenderer::new(ChartStyle::default(), dir.path(), false);
        let err = renderer
            .render(ChartKind::Bar, ChartInput::Text("some titles"), &ChartLabels::new("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedInput {
                kind: ChartKind::Bar,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let dir = tempdir().unwrap();
        let renderer = ChartRenderer::new(ChartStyle::default(), dir.path(), false);
        let empty = AggregateResult::new("k", "v", Vec::new());
        assert!(matches!(
            renderer.bar(&empty, &ChartLabels::new("empty bar")),
            Err(RenderError::EmptyData(_))
        ));

        let zero = AggregateResult::new(
            "k",
            "v",
            vec![AggregateEntry {
                key: GroupKey::single("a"),
                value: 0.0,
            }],
        );
        assert!(matches!(
            renderer.pie(&zero, &ChartLabels::new("zero pie")),
            Err(RenderError::EmptyData(_))
        ));
        assert!(matches!(
            renderer.word_cloud("the of and", &ChartLabels::new("stopwords only")),
            Err(RenderError::EmptyData(_))
        ));

        let panels = vec![Panel {
            title: "Most Land".to_string(),
            data: PanelData::Bars(empty.clone()),
            fill: BarFill::Single(0),
        }];
        assert!(matches!(
            renderer.grouped_subplot(&panels, &ChartLabels::new("grid")),
            Err(RenderError::EmptyData(ref t)) if t == "Most Land"
        ));
    }
}
