//! CLI command implementations

pub mod check;
pub mod library;
pub mod render;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use trellis_loader::{FetcherChain, TrellisConfig};

/// Library sources given on the command line. They are searched before
/// the configured ones.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory of `<namespace>.lib.toml` manifests (repeatable)
    #[arg(long = "libraries", value_name = "DIR")]
    pub libraries: Vec<PathBuf>,

    /// Base URL serving `<namespace>.lib.toml` manifests (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,
}

/// Load layered config and put the command-line sources in front
pub fn load_config(sources: &SourceArgs) -> Result<TrellisConfig> {
    let mut config = TrellisConfig::load().context("Failed to load config")?;
    apply_sources(&mut config, sources);
    tracing::debug!(
        paths = ?config.libraries.paths,
        urls = ?config.libraries.urls,
        "library sources"
    );
    Ok(config)
}

fn apply_sources(config: &mut TrellisConfig, sources: &SourceArgs) {
    let mut paths = sources.libraries.clone();
    paths.extend(
        config
            .libraries
            .paths
            .drain(..)
            .filter(|p| !sources.libraries.contains(p)),
    );
    config.libraries.paths = paths;

    let mut urls = sources.urls.clone();
    urls.extend(
        config
            .libraries
            .urls
            .drain(..)
            .filter(|u| !sources.urls.contains(u)),
    );
    config.libraries.urls = urls;
}

pub fn build_fetcher(config: &TrellisConfig) -> Result<FetcherChain> {
    let chain = config.build_fetcher();
    if chain.is_empty() {
        anyhow::bail!(
            "No library sources configured. Pass --libraries DIR or --url URL, \
             or set TRELLIS_LIBRARY_PATH."
        );
    }
    Ok(chain)
}
