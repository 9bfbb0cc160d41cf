use serde::{Deserialize, Serialize};

use crate::model::position::Position;

/// A movie in the catalog.
///
/// Records are immutable once the catalog is loaded. `external_id` is the
/// identifier used by the poster collaborator (a TMDB movie id in the
/// shipped artifacts); the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub position: Position,
    pub title: String,
    pub external_id: Option<u64>,
}

impl MovieRecord {
    #[must_use]
    pub fn new(position: Position, title: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            external_id: None,
        }
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: u64) -> Self {
        self.external_id = Some(external_id);
        self
    }
}
