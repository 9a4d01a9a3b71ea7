//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_static::SiteBuilder;

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let config = file_config.build_config(output, minify)?;

    let result = SiteBuilder::new(config)
        .build()
        .await
        .context("Build failed")?;

    for failure in &result.failed {
        tracing::warn!("Skipped {}", failure);
    }

    tracing::info!(
        "Built {} sections, copied {} files in {}ms",
        result.sections,
        result.copied,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
