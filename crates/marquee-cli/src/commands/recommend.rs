use std::io::Write;

use anyhow::Result;
use marquee_search::{Recommendation, Recommender};
use marquee_tmdb::PosterSource;
use serde::Serialize;

use crate::config::Config;

/// JSON shape of a recommendation.
#[derive(Debug, Serialize)]
struct RecommendationView<'a> {
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_title: Option<&'a str>,
    items: Vec<ItemView<'a>>,
}

#[derive(Debug, Serialize)]
struct ItemView<'a> {
    title: &'a str,
    external_id: Option<u64>,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    poster_url: Option<String>,
}

/// Poster URLs for each recommended item, when a poster source is given.
async fn poster_urls(
    recommendation: &Recommendation,
    posters: Option<&dyn PosterSource>,
) -> Vec<Option<String>> {
    let mut urls = Vec::with_capacity(recommendation.items().len());
    for item in recommendation.items() {
        let url = match posters {
            Some(source) => Some(source.poster_url(item.external_id()).await),
            None => None,
        };
        urls.push(url);
    }
    urls
}

/// Print a recommendation as text.
pub async fn render_text<W: Write>(
    out: &mut W,
    recommendation: &Recommendation,
    posters: Option<&dyn PosterSource>,
) -> Result<()> {
    match recommendation {
        Recommendation::NoMatch { query } => {
            writeln!(out, "No close match found for '{}'. Try another title.", query)?;
        }
        Recommendation::Matched { matched, items } => {
            writeln!(out, "Showing recommendations for: {}", matched.title)?;
            if items.is_empty() {
                writeln!(out, "\nNo other movies in the catalog to recommend.")?;
                return Ok(());
            }

            let urls = poster_urls(recommendation, posters).await;
            writeln!(out, "\nTop {} Recommendations:", items.len())?;
            for (item, url) in items.iter().zip(urls) {
                writeln!(out, "  {}. {}", item.rank, item.title())?;
                if let Some(url) = url {
                    writeln!(out, "     poster: {}", url)?;
                }
            }
        }
    }
    Ok(())
}

/// Print a recommendation as JSON.
pub async fn render_json<W: Write>(
    out: &mut W,
    recommendation: &Recommendation,
    posters: Option<&dyn PosterSource>,
) -> Result<()> {
    let urls = poster_urls(recommendation, posters).await;
    let view = RecommendationView {
        matched: recommendation.is_match(),
        matched_title: recommendation.matched_title(),
        items: recommendation
            .items()
            .iter()
            .zip(urls)
            .map(|(item, poster_url)| ItemView {
                title: item.title(),
                external_id: item.external_id(),
                score: item.score,
                poster_url,
            })
            .collect(),
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
    Ok(())
}

/// Render a recommendation in full, poster lookups included, before
/// anything is written to the terminal.
async fn render(
    recommendation: &Recommendation,
    posters: Option<&dyn PosterSource>,
    json: bool,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if json {
        render_json(&mut buf, recommendation, posters).await?;
    } else {
        render_text(&mut buf, recommendation, posters).await?;
    }
    Ok(buf)
}

/// Recommend movies similar to `query` and print them.
pub async fn run_recommend(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    with_posters: bool,
    json: bool,
) -> Result<()> {
    let artifacts = super::load_artifacts(config)?;
    let recommender = Recommender::new(&artifacts)
        .with_matcher(config.matcher()?)
        .with_ranker(config.ranker(limit)?);

    let posters = if with_posters {
        Some(super::poster_source(config)?)
    } else {
        None
    };

    let recommendation = recommender.recommend(query);

    let rendered = render(&recommendation, posters.as_deref(), json).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&rendered)?;
    stdout.flush()?;

    Ok(())
}
