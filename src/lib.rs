//! Tabular EDA - exploratory analysis of CSV tables
//!
//! Loads a CSV into a DataFrame, cleans it, aggregates it into ranked series
//! and renders each series as a PNG chart. Two runs are provided: a streaming
//! catalog analysis and a world population analysis.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipelines;
pub mod stats;

use tracing_subscriber::{fmt, EnvFilter};

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
