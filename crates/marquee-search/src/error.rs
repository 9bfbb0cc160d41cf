//! Configuration errors for the search layer.
//!
//! Searching itself never fails: a query with no close title is a normal
//! [`Recommendation::NoMatch`](crate::Recommendation::NoMatch).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// Match threshold outside `[0.0, 1.0]`.
    #[error("match threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),

    /// A ranker asked to return zero neighbours.
    #[error("recommendation limit must be at least 1")]
    InvalidLimit,
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
