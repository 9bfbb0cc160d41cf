//! The catalog store: an ordered, zero-based sequence of movies.

use crate::model::{MovieRecord, Position};

/// Immutable, densely indexed list of movies.
///
/// Lowercased titles are computed once at construction so that fuzzy
/// matching never re-normalizes the catalog per query.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    normalized: Vec<String>,
}

impl Catalog {
    /// Build a catalog from `(title, external_id)` pairs, assigning
    /// positions in iteration order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<u64>)>,
        S: Into<String>,
    {
        let records: Vec<MovieRecord> = entries
            .into_iter()
            .enumerate()
            .map(|(index, (title, external_id))| {
                let record = MovieRecord::new(Position::new(index), title);
                match external_id {
                    Some(id) => record.with_external_id(id),
                    None => record,
                }
            })
            .collect();
        let normalized = records.iter().map(|r| r.title.to_lowercase()).collect();
        Self {
            records,
            normalized,
        }
    }

    /// Build a catalog of titles with no external ids.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(titles.into_iter().map(|t| (t, None)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: Position) -> Option<&MovieRecord> {
        self.records.get(position.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.records.iter()
    }

    /// Lowercased titles, aligned with positions.
    #[must_use]
    pub fn normalized_titles(&self) -> &[String] {
        &self.normalized
    }

    /// First position whose lowercased title equals `normalized`.
    #[must_use]
    pub fn first_position_of(&self, normalized: &str) -> Option<Position> {
        self.normalized
            .iter()
            .position(|t| t == normalized)
            .map(Position::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_dense_and_zero_based() {
        let catalog = Catalog::from_titles(["Avatar", "Spectre", "Tangled"]);
        let positions: Vec<usize> = catalog.iter().map(|m| m.position.index()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_normalized_titles_are_lowercase() {
        let catalog = Catalog::from_titles(["The Dark Knight", "AVATAR"]);
        assert_eq!(catalog.normalized_titles(), ["the dark knight", "avatar"]);
    }

    #[test]
    fn test_first_position_of_prefers_earliest_duplicate() {
        let catalog = Catalog::from_titles(["Heist", "The Thing", "the thing"]);
        assert_eq!(catalog.first_position_of("the thing"), Some(Position::new(1)));
        assert_eq!(catalog.first_position_of("alien"), None);
    }

    #[test]
    fn test_get_out_of_range() {
        let catalog = Catalog::from_titles(["Avatar"]);
        assert!(catalog.get(Position::new(0)).is_some());
        assert!(catalog.get(Position::new(1)).is_none());
    }

    #[test]
    fn test_from_entries_keeps_external_ids() {
        let catalog = Catalog::from_entries([("Avatar", Some(19995)), ("Unknown", None)]);
        assert_eq!(catalog.get(Position::new(0)).unwrap().external_id, Some(19995));
        assert_eq!(catalog.get(Position::new(1)).unwrap().external_id, None);
    }

    #[test]
    fn test_from_entries_builds_records() {
        let catalog = Catalog::from_entries([("Spectre", Some(206_647)), ("Heat", None)]);
        assert_eq!(
            catalog.get(Position::new(0)),
            Some(&MovieRecord::new(Position::new(0), "Spectre").with_external_id(206_647))
        );
        assert_eq!(
            catalog.get(Position::new(1)),
            Some(&MovieRecord::new(Position::new(1), "Heat"))
        );
    }
}
