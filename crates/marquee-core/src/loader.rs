//! Artifact loading for the catalog and similarity matrix.
//!
//! Both artifacts are JSON. The catalog is an array of movie objects:
//!
//! ```json
//! [
//!   { "movie_id": 19995, "title": "Avatar", "tags": "..." },
//!   { "movie_id": 285, "title": "Pirates of the Caribbean: At World's End" }
//! ]
//! ```
//!
//! Only `title` is required. The external id may be spelled `movie_id`,
//! `tmdb_id` or `id`, and when several are present the first in that
//! order wins. Every other field (including any `index` left over
//! from the export) is ignored and positions are reassigned in array order.
//!
//! The similarity artifact is an array of N rows of N numbers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;

/// A catalog entry as it appears in the exported JSON.
///
/// Merged exports can carry more than one id column, so each spelling is
/// its own field.
#[derive(Debug, Deserialize)]
struct RawMovie {
    title: String,
    #[serde(default)]
    movie_id: Option<u64>,
    #[serde(default)]
    tmdb_id: Option<u64>,
    #[serde(default)]
    id: Option<u64>,
}

impl RawMovie {
    /// `movie_id`, then `tmdb_id`, then `id`.
    fn external_id(&self) -> Option<u64> {
        self.movie_id.or(self.tmdb_id).or(self.id)
    }
}

/// Load the catalog artifact.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Vec<RawMovie> = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_entries(
        raw.into_iter().map(|m| {
            let external_id = m.external_id();
            (m.title, external_id)
        }),
    ))
}

/// Load the similarity artifact.
pub fn load_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Vec<f64>> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    SimilarityMatrix::from_rows(rows)
}

/// The catalog and similarity matrix, checked to agree in size.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Artifacts {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl Artifacts {
    /// Pair an in-memory catalog with its matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCatalog`] for an empty catalog and
    /// [`Error::DimensionMismatch`] when the matrix is not N×N for a
    /// catalog of N movies.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        if similarity.dim() != catalog.len() {
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                rows: similarity.dim(),
                cols: similarity.dim(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// Load both artifacts from disk.
    ///
    /// Any failure here is fatal: there is no partial mode.
    pub fn load(catalog_path: &Path, similarity_path: &Path) -> Result<Self> {
        let catalog = load_catalog(catalog_path)?;
        log::debug!(
            "Read {} movies from {}",
            catalog.len(),
            catalog_path.display()
        );
        let similarity = load_similarity(similarity_path)?;
        log::debug!(
            "Read {0}x{0} similarity matrix from {1}",
            similarity.dim(),
            similarity_path.display()
        );

        let artifacts = Self::new(catalog, similarity)?;
        log::info!("Loaded catalog of {} movies", artifacts.catalog.len());
        Ok(artifacts)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
