//! Core data model for marquee.
//!
//! This crate defines the movie catalog, the precomputed similarity
//! matrix whose rows align with catalog positions, and the loader that
//! reads both artifacts from disk and checks they agree in size.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod model;
pub mod similarity;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use loader::{load_catalog, load_similarity, Artifacts};
pub use model::{MovieRecord, Position};
pub use similarity::SimilarityMatrix;
