use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based index of a movie in the catalog.
///
/// A position is the only key joining a catalog entry to its row (and
/// column) in the similarity matrix. Positions are assigned densely at
/// load time; any index carried by the source artifact is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(usize);

impl Position {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Position {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
