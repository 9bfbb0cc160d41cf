use anyhow::{Context, Result};
use confyg::{env, Confygery};
use marquee_search::{FuzzyMatcher, Ranker, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use marquee_tmdb::{TmdbSettings, DEFAULT_PLACEHOLDER_URL};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for marquee.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MARQUEE_* prefix)
/// 3. Config file (~/.config/marquee/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the movie catalog artifact.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/movies.json
    /// - ENV: MARQUEE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/movies.json"
    /// - Default: ~/.local/share/marquee/movies.json
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the similarity matrix artifact.
    ///
    /// Can be set via:
    /// - CLI: --similarity /path/to/similarity.json
    /// - ENV: MARQUEE_SIMILARITY_PATH
    /// - Config: similarity_path = "/path/to/similarity.json"
    /// - Default: ~/.local/share/marquee/similarity.json
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// TMDB API key (required for poster lookup).
    ///
    /// Can be set via:
    /// - ENV: MARQUEE_TMDB_API_KEY
    /// - Config: tmdb_api_key = "..."
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default)]
    pub recommend: RecommendConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub logging: twyg::Opts,
}

/// `[recommend]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendConfig {
    /// How many similar movies to show.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum title similarity ratio (0.0 to 1.0) for a query to match.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// `[tmdb]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; 0 is treated as 1.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            similarity_path: default_similarity_path(),
            tmdb_api_key: None,
            recommend: RecommendConfig::default(),
            tmdb: TmdbConfig::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            threshold: default_threshold(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            placeholder_url: default_placeholder_url(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/marquee/config.toml
    /// Reads environment variables with MARQUEE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("marquee");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply `--catalog` / `--similarity` overrides.
    #[must_use]
    pub fn with_artifact_paths(
        mut self,
        catalog: Option<PathBuf>,
        similarity: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = catalog {
            self.catalog_path = path;
        }
        if let Some(path) = similarity {
            self.similarity_path = path;
        }
        self
    }

    /// Matcher built from `recommend.threshold`.
    pub fn matcher(&self) -> Result<FuzzyMatcher> {
        FuzzyMatcher::with_threshold(self.recommend.threshold)
            .context("Invalid recommend.threshold")
    }

    /// Ranker built from `recommend.limit`, optionally overridden.
    pub fn ranker(&self, limit: Option<usize>) -> Result<Ranker> {
        Ranker::with_limit(limit.unwrap_or(self.recommend.limit))
            .context("Invalid recommend.limit")
    }

    /// TMDB client settings, if an API key is configured.
    pub fn tmdb_settings(&self) -> Option<TmdbSettings> {
        let api_key = self.tmdb_api_key.as_deref().filter(|k| !k.is_empty())?;
        let mut settings = TmdbSettings::new(api_key);
        settings.base_url.clone_from(&self.tmdb.base_url);
        settings.placeholder_url.clone_from(&self.tmdb.placeholder_url);
        settings.timeout = Duration::from_secs(self.tmdb.timeout_secs.max(1));
        settings.max_retries = self.tmdb.max_retries;
        Some(settings)
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_tmdb_base_url() -> String {
    marquee_tmdb::client::TMDB_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    2
}

fn default_placeholder_url() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

/// Returns: ~/.local/share/marquee/movies.json (or platform equivalent)
fn default_catalog_path() -> PathBuf {
    data_dir().join("movies.json")
}

/// Returns: ~/.local/share/marquee/similarity.json (or platform equivalent)
fn default_similarity_path() -> PathBuf {
    data_dir().join("similarity.json")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/marquee/config.toml
/// - macOS: ~/Library/Application Support/marquee/config.toml
/// - Windows: %APPDATA%\marquee\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Marquee Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (MARQUEE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Precomputed artifacts
#
# movies.json is a JSON array of {"movie_id": ..., "title": ...} objects;
# similarity.json is an N x N array of scores, row i matching movie i.
#
# Can also be set via:
# - CLI: marquee --catalog /path/movies.json --similarity /path/similarity.json
# - Environment: MARQUEE_CATALOG_PATH, MARQUEE_SIMILARITY_PATH
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/movies.json"
#similarity_path = "/path/to/similarity.json"

# TMDB API key for poster lookup (only used with --posters)
#
# Register for a free API key at: https://www.themoviedb.org/settings/api
#
# Can also be set via:
# - Environment: MARQUEE_TMDB_API_KEY=your-key-here
#tmdb_api_key = "your-tmdb-api-key-here"

[recommend]
# Number of similar movies to show
limit = 5
# Minimum title similarity (0.0 - 1.0) for a search to match a movie
threshold = 0.5

[tmdb]
base_url = "https://api.themoviedb.org/3"
timeout_secs = 10
# Retries for timeouts, rate limiting and server errors
max_retries = 2
placeholder_url = "https://via.placeholder.com/500x750?text=No+Poster"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog_path.ends_with("movies.json"));
        assert!(config.similarity_path.ends_with("similarity.json"));
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.recommend.limit, 5);
        assert!((config.recommend.threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_artifact_path_overrides() {
        let config = Config::default().with_artifact_paths(Some(PathBuf::from("/tmp/m.json")), None);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/m.json"));
        assert!(config.similarity_path.ends_with("similarity.json"));
    }

    #[test]
    fn test_ranker_limit_override() {
        let config = Config::default();
        assert_eq!(config.ranker(None).unwrap().limit(), 5);
        assert_eq!(config.ranker(Some(3)).unwrap().limit(), 3);
        assert!(config.ranker(Some(0)).is_err());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = Config::default();
        config.recommend.threshold = 2.0;
        assert!(config.matcher().is_err());
    }

    #[test]
    fn test_tmdb_settings_require_key() {
        let mut config = Config::default();
        assert!(config.tmdb_settings().is_none());

        config.tmdb_api_key = Some(String::new());
        assert!(config.tmdb_settings().is_none());

        config.tmdb_api_key = Some("abc".to_string());
        config.tmdb.max_retries = 0;
        let settings = config.tmdb_settings().unwrap();
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.timeout, Duration::from_secs(10));

        config.tmdb.timeout_secs = 0;
        assert_eq!(
            config.tmdb_settings().unwrap().timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_example_config_parses_as_toml() {
        let doc: toml_edit::DocumentMut = example_config().parse().unwrap();
        assert_eq!(doc["recommend"]["limit"].as_integer(), Some(5));
        assert_eq!(doc["tmdb"]["max_retries"].as_integer(), Some(2));
    }
}
