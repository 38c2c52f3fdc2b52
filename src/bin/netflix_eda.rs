use anyhow::{Context, Result};
use std::path::Path;
use tabular_eda::config::{AnalysisConfig, CONFIG_FILE};
use tabular_eda::pipelines::netflix;

fn main() -> Result<()> {
    tabular_eda::init_tracing();

    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load configuration")?;
    tracing::info!(input = %config.netflix_csv.display(), "Starting catalog analysis");

    netflix::run(&config).context("Catalog analysis failed")?;

    tracing::info!(
        output = %config.cleaned_netflix_csv.display(),
        "Catalog analysis complete"
    );
    Ok(())
}
