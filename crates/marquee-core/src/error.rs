use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("catalog has {catalog} entries but similarity matrix is {rows}x{cols}")]
    DimensionMismatch {
        catalog: usize,
        rows: usize,
        cols: usize,
    },

    #[error("similarity row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("similarity score at ({row}, {col}) is not finite")]
    NonFiniteScore { row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
