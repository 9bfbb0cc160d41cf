//! Poster lookup for marquee.
//!
//! Resolves a movie's external id to a displayable poster URL through the
//! TMDB API. Lookups never fail from the caller's point of view: any
//! missing id, missing poster or HTTP failure yields a placeholder image.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod error;
pub mod source;

pub use client::{TmdbClient, TmdbSettings};
pub use error::{PosterError, PosterResult};
pub use source::{PlaceholderPosters, PosterSource, DEFAULT_PLACEHOLDER_URL};
