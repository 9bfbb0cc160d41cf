//! Query-to-recommendations orchestration.
//!
//! The [`Recommender`] borrows the loaded [`Artifacts`] and is a pure
//! function of the query and that data: the same query always yields the
//! same recommendation.

use marquee_core::{Artifacts, MovieRecord};

use crate::matcher::FuzzyMatcher;
use crate::ranker::Ranker;

/// One recommended movie.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommended {
    pub record: MovieRecord,
    pub score: f64,
    /// 1-based rank in the result list.
    pub rank: usize,
}

impl Recommended {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }

    #[must_use]
    pub const fn external_id(&self) -> Option<u64> {
        self.record.external_id
    }
}

/// Outcome of a recommendation query.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// The query resolved to `matched`; `items` are its nearest neighbours.
    Matched {
        matched: MovieRecord,
        items: Vec<Recommended>,
    },
    /// No catalog title was close enough to the query.
    NoMatch { query: String },
}

impl Recommendation {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    #[must_use]
    pub fn matched_title(&self) -> Option<&str> {
        match self {
            Self::Matched { matched, .. } => Some(&matched.title),
            Self::NoMatch { .. } => None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Recommended] {
        match self {
            Self::Matched { items, .. } => items,
            Self::NoMatch { .. } => &[],
        }
    }
}

/// Recommends movies similar to a free-text title query.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    artifacts: &'a Artifacts,
    matcher: FuzzyMatcher,
    ranker: Ranker,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub fn new(artifacts: &'a Artifacts) -> Self {
        Self {
            artifacts,
            matcher: FuzzyMatcher::default(),
            ranker: Ranker::default(),
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: FuzzyMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub fn with_ranker(mut self, ranker: Ranker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn recommend(&self, query: &str) -> Recommendation {
        let catalog = self.artifacts.catalog();

        let Some(matched) = self
            .matcher
            .best_match(catalog, query)
            .and_then(|m| catalog.get(m.position))
        else {
            log::debug!("No close match for '{}'", query.trim());
            return Recommendation::NoMatch {
                query: query.to_string(),
            };
        };

        let items: Vec<Recommended> = self
            .ranker
            .rank(self.artifacts.similarity(), matched.position)
            .into_iter()
            .filter_map(|n| catalog.get(n.position).map(|record| (record, n.score)))
            .enumerate()
            .map(|(i, (record, score))| Recommended {
                record: record.clone(),
                score,
                rank: i + 1,
            })
            .collect();

        log::debug!(
            "Recommending {} movies for '{}'",
            items.len(),
            matched.title
        );

        Recommendation::Matched {
            matched: matched.clone(),
            items,
        }
    }
}
