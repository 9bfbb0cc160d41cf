//! Title search and recommendation for marquee.
//!
//! Matches a free-text query against the catalog with a
//! Ratcliff/Obershelp similarity ratio, then ranks the matched movie's
//! neighbours by their precomputed similarity scores.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod matcher;
pub mod ranker;
pub mod ratio;
pub mod recommender;

pub use error::{SearchError, SearchResult};
pub use matcher::{FuzzyMatcher, TitleMatch, DEFAULT_THRESHOLD};
pub use ranker::{Neighbor, Ranker, DEFAULT_LIMIT};
pub use recommender::{Recommendation, Recommended, Recommender};
