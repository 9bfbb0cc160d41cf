use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the movie catalog (default: ~/.local/share/marquee/movies.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to the similarity matrix (default: ~/.local/share/marquee/similarity.json)
    #[arg(long, global = true)]
    similarity: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    ///
    /// The title does not have to be exact: it is matched against the
    /// catalog ignoring case and surrounding whitespace, and small typos
    /// are tolerated. If nothing in the catalog is close enough, marquee
    /// says so and suggests trying another title.
    ///
    /// Output:
    /// - The catalog title the search matched
    /// - The most similar movies, best first (5 by default)
    /// - With --posters, a poster URL for each (requires a TMDB API key,
    ///   otherwise a placeholder image is shown)
    Recommend {
        /// Movie title to search for
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Number of recommendations (overrides recommend.limit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Look up a poster for each recommendation
        #[arg(long)]
        posters: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search for titles interactively
    Interactive {
        /// Look up a poster for each recommendation
        #[arg(long)]
        posters: bool,
    },
    /// Show catalog statistics
    Info,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get {
        /// Key such as recommend.limit
        key: Option<String>,
    },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_artifact_paths(cli.catalog, cli.similarity);

    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    match cli.command {
        Commands::Recommend {
            title,
            limit,
            posters,
            json,
        } => {
            let query = title.join(" ");
            commands::run_recommend(&config, &query, limit, posters, json).await?;
        }
        Commands::Interactive { posters } => {
            commands::run_interactive(&config, posters).await?;
        }
        Commands::Info => {
            commands::show_info(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
