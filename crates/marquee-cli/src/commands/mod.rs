pub mod config;
pub mod info;
pub mod interactive;
pub mod recommend;

pub use info::show_info;
pub use interactive::run_interactive;
pub use recommend::run_recommend;

use anyhow::{Context, Result};
use marquee_core::Artifacts;
use marquee_tmdb::{PlaceholderPosters, PosterSource, TmdbClient};

use crate::config::Config;

/// Load the catalog and similarity artifacts named in the config.
///
/// Failure here is fatal for every command that needs them.
pub fn load_artifacts(config: &Config) -> Result<Artifacts> {
    Artifacts::load(&config.catalog_path, &config.similarity_path).with_context(|| {
        format!(
            "Failed to load artifacts (catalog: {}, similarity: {})",
            config.catalog_path.display(),
            config.similarity_path.display()
        )
    })
}

/// Poster source for `--posters`: TMDB when a key is configured, otherwise
/// placeholders only.
pub fn poster_source(config: &Config) -> Result<Box<dyn PosterSource>> {
    match config.tmdb_settings() {
        Some(settings) => {
            let client = TmdbClient::new(settings).context("Failed to create TMDB client")?;
            Ok(Box::new(client))
        }
        None => {
            log::warn!("No TMDB API key configured; showing placeholder posters");
            Ok(Box::new(PlaceholderPosters::new(
                config.tmdb.placeholder_url.clone(),
            )))
        }
    }
}
