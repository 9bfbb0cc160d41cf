use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use marquee_search::Recommender;
use marquee_tmdb::PosterSource;

use crate::config::Config;

const PROMPT: &str = "🔍 Movie> ";
const QUIT_COMMAND: &str = ":q";
const EMPTY_INPUT_HINT: &str = "Please enter a movie name to get recommendations.";

/// Answer queries read line by line from `input` until EOF or `:q`.
///
/// Every other non-empty line is a title search, so words such as
/// "quit" or "exit" stay searchable.
///
/// Returns the number of queries answered.
pub async fn run_session<R: BufRead, W: Write>(
    recommender: &Recommender<'_>,
    posters: Option<&dyn PosterSource>,
    input: R,
    out: &mut W,
) -> Result<usize> {
    let mut answered = 0;

    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let query = line.trim();

        match query {
            "" => writeln!(out, "{}", EMPTY_INPUT_HINT)?,
            QUIT_COMMAND => break,
            _ => {
                let recommendation = recommender.recommend(query);
                super::recommend::render_text(out, &recommendation, posters).await?;
                answered += 1;
            }
        }

        writeln!(out)?;
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }

    Ok(answered)
}

/// Interactive search loop on stdin/stdout.
pub async fn run_interactive(config: &Config, with_posters: bool) -> Result<()> {
    let artifacts = super::load_artifacts(config)?;
    let recommender = Recommender::new(&artifacts)
        .with_matcher(config.matcher()?)
        .with_ranker(config.ranker(None)?);

    let posters = if with_posters {
        Some(super::poster_source(config)?)
    } else {
        None
    };

    println!("\n🎬 Marquee Movie Recommender\n");
    println!(
        "  {} movies loaded. Type a title and press Enter (':q' to quit).\n",
        artifacts.catalog().len()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let answered = run_session(&recommender, posters.as_deref(), stdin.lock(), &mut stdout).await?;

    log::debug!("Interactive session answered {} queries", answered);
    println!();

    Ok(())
}
