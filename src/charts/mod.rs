//! Charts module - Chart rendering

mod renderer;
mod style;
mod wordcloud;

pub use renderer::{
    slugify, tile_grid, BarFill, ChartInput, ChartKind, ChartLabels, ChartRenderer, NamedSeries,
    Panel, PanelData, RenderError,
};
pub use style::{compact_number, parse_hex_color, viridis, ChartStyle, DEFAULT_PALETTE};
pub use wordcloud::{word_frequencies, WordFrequency};
