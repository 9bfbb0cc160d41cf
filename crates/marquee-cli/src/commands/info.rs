use anyhow::Result;

use crate::config::Config;

/// Show what is loaded: artifact paths and catalog statistics.
pub fn show_info(config: &Config) -> Result<()> {
    let artifacts = super::load_artifacts(config)?;
    let catalog = artifacts.catalog();
    let with_ids = catalog.iter().filter(|m| m.external_id.is_some()).count();

    println!("\n🎬 Marquee Catalog\n");
    println!("  Catalog: {}", config.catalog_path.display());
    println!("  Similarity: {}", config.similarity_path.display());
    println!("  Movies: {}", catalog.len());
    println!(
        "  Similarity matrix: {0}x{0}",
        artifacts.similarity().dim()
    );
    println!("  Movies with TMDB ids: {}", with_ids);

    if with_ids < catalog.len() {
        println!(
            "\n  {} movies have no TMDB id and will always show a placeholder poster",
            catalog.len() - with_ids
        );
    }

    Ok(())
}
