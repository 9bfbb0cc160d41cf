use std::path::Path;

use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut};

use crate::config::{self, Config};

const VALID_KEYS: &str = "catalog_path, similarity_path, tmdb_api_key, recommend.limit, \
recommend.threshold, tmdb.base_url, tmdb.timeout_secs, tmdb.max_retries, tmdb.placeholder_url";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  similarity_path: {}", config.similarity_path.display());
    println!(
        "  tmdb_api_key: {}",
        config.tmdb_api_key.as_deref().map_or("<not set>", |_| "<set>")
    );
    println!("  recommend.limit: {}", config.recommend.limit);
    println!("  recommend.threshold: {}", config.recommend.threshold);
    println!("  tmdb.base_url: {}", config.tmdb.base_url);
    println!("  tmdb.timeout_secs: {}", config.tmdb.timeout_secs);
    println!("  tmdb.max_retries: {}", config.tmdb.max_retries);
    println!("  tmdb.placeholder_url: {}", config.tmdb.placeholder_url);
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (MARQUEE_*) > Config file > Defaults");

    Ok(())
}

/// Look up a single effective config value by key.
fn lookup(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "catalog_path" => config.catalog_path.display().to_string(),
        "similarity_path" => config.similarity_path.display().to_string(),
        "tmdb_api_key" => config
            .tmdb_api_key
            .clone()
            .unwrap_or_else(|| String::from("<not set>")),
        "recommend.limit" => config.recommend.limit.to_string(),
        "recommend.threshold" => config.recommend.threshold.to_string(),
        "tmdb.base_url" => config.tmdb.base_url.clone(),
        "tmdb.timeout_secs" => config.tmdb.timeout_secs.to_string(),
        "tmdb.max_retries" => config.tmdb.max_retries.to_string(),
        "tmdb.placeholder_url" => config.tmdb.placeholder_url.clone(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    };
    Ok(value)
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", lookup(config, &key)?);
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'marquee config init' to create it.");
        }
    }

    Ok(())
}

/// Write `key = value` into the TOML document at `path`, keeping comments
/// and layout intact.
fn set_in_file(path: &Path, key: &str, raw: &str) -> Result<()> {
    let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    match key {
        "catalog_path" | "similarity_path" | "tmdb_api_key" => {
            doc[key] = value(raw);
        }
        "recommend.limit" => {
            let limit: i64 = raw.parse().context("recommend.limit must be an integer")?;
            anyhow::ensure!(limit >= 1, "recommend.limit must be at least 1");
            doc["recommend"]["limit"] = value(limit);
        }
        "recommend.threshold" => {
            let threshold: f64 = raw.parse().context("recommend.threshold must be a number")?;
            anyhow::ensure!(
                (0.0..=1.0).contains(&threshold),
                "recommend.threshold must be between 0.0 and 1.0"
            );
            doc["recommend"]["threshold"] = value(threshold);
        }
        "tmdb.timeout_secs" => {
            let secs: i64 = raw
                .parse()
                .context("tmdb.timeout_secs must be an integer")?;
            anyhow::ensure!(secs >= 1, "tmdb.timeout_secs must be at least 1");
            doc["tmdb"]["timeout_secs"] = value(secs);
        }
        "tmdb.max_retries" => {
            let retries: i64 = raw
                .parse()
                .context("tmdb.max_retries must be an integer")?;
            anyhow::ensure!(retries >= 0, "tmdb.max_retries must not be negative");
            doc["tmdb"]["max_retries"] = value(retries);
        }
        "tmdb.base_url" | "tmdb.placeholder_url" => {
            let field = key.trim_start_matches("tmdb.");
            doc["tmdb"][field] = value(raw);
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    std::fs::write(path, doc.to_string()).context("Failed to write config file")?;
    Ok(())
}

/// Set a config value.
pub fn set_config(key: String, value: String) -> Result<()> {
    let config_path = config::config_file_path();

    // Ensure config file exists
    config::ensure_config_file()?;

    set_in_file(&config_path, &key, &value)?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure marquee.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
