//! Fuzzy title matching against the catalog.

use marquee_core::{Catalog, Position};

use crate::error::{SearchError, SearchResult};
use crate::ratio::QueryProfile;

/// Minimum similarity ratio for a title to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// The catalog entry a query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub position: Position,
    /// Similarity ratio between the normalized query and the title.
    pub ratio: f64,
}

/// Resolves free-text queries to a single catalog position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom acceptance threshold (inclusive).
    pub fn with_threshold(threshold: f64) -> SearchResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SearchError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Trim and lowercase a raw query.
    #[must_use]
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Find the catalog entry whose title best matches `query`.
    ///
    /// Returns `None` when the query is blank or no title reaches the
    /// threshold. When several titles share the best ratio the greatest
    /// lowercased title wins, and that title resolves to its first position
    /// in the catalog.
    #[must_use]
    pub fn best_match(&self, catalog: &Catalog, query: &str) -> Option<TitleMatch> {
        let normalized = Self::normalize(query);
        if normalized.is_empty() {
            return None;
        }
        let profile = QueryProfile::new(&normalized);

        let mut best: Option<(f64, &str)> = None;
        for title in catalog.normalized_titles() {
            if profile.real_quick_ratio(title.chars().count()) < self.threshold {
                continue;
            }
            let chars: Vec<char> = title.chars().collect();
            if profile.quick_ratio(&chars) < self.threshold {
                continue;
            }
            let ratio = profile.ratio(&chars);
            if ratio < self.threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_ratio, best_title)) => {
                    ratio > best_ratio || (ratio == best_ratio && title.as_str() > best_title)
                }
            };
            if better {
                best = Some((ratio, title.as_str()));
            }
        }

        let (ratio, title) = best?;
        let position = catalog.first_position_of(title)?;
        log::debug!("Query '{}' matched '{}' (ratio {:.3})", normalized, title, ratio);
        Some(TitleMatch { position, ratio })
    }
}
