use anyhow::{Context, Result};
use std::path::Path;
use tabular_eda::config::{AnalysisConfig, CONFIG_FILE};
use tabular_eda::pipelines::population;

fn main() -> Result<()> {
    tabular_eda::init_tracing();

    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load configuration")?;
    tracing::info!(input = %config.population_csv.display(), "Starting population analysis");

    population::run(&config).context("Population analysis failed")?;
    Ok(())
}
