//! Poster lookup errors.
//!
//! These never reach the caller of [`PosterSource`](crate::PosterSource);
//! they drive retry decisions and are logged before falling back to the
//! placeholder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosterError {
    /// TMDB answered with a non-success status.
    #[error("TMDB returned HTTP {status}")]
    Status { status: u16 },

    /// TMDB answered 429.
    #[error("rate limited by TMDB")]
    RateLimited,

    /// The response body was not the expected JSON.
    #[error("could not parse TMDB response: {0}")]
    Parse(String),

    /// Connection, timeout or other transport failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl PosterError {
    /// Returns `true` when the lookup may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Status { status } => *status >= 500,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Parse(_) => false,
        }
    }
}

pub type PosterResult<T> = std::result::Result<T, PosterError>;
