//! Top-K neighbour selection from a similarity row.

use std::cmp::Ordering;

use marquee_core::{Position, SimilarityMatrix};

use crate::error::{SearchError, SearchResult};

/// Number of neighbours returned per query.
pub const DEFAULT_LIMIT: usize = 5;

/// A ranked neighbour of the matched movie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Position,
    pub score: f64,
}

/// Ranks a matrix row and returns the best-scoring neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    limit: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Ranker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> SearchResult<Self> {
        if limit == 0 {
            return Err(SearchError::InvalidLimit);
        }
        Ok(Self { limit })
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Rank every entry of row `position` by descending score.
    ///
    /// The sort is stable, so equal scores keep catalog order. The first
    /// ranked slot is taken to be the movie itself and is skipped whatever
    /// position it holds; the next `limit` entries are returned.
    #[must_use]
    pub fn rank(&self, similarity: &SimilarityMatrix, position: Position) -> Vec<Neighbor> {
        let Some(row) = similarity.row(position) else {
            return Vec::new();
        };

        let mut ranked: Vec<Neighbor> = row
            .iter()
            .enumerate()
            .map(|(index, &score)| Neighbor {
                position: Position::new(index),
                score,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        ranked.into_iter().skip(1).take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(rows).unwrap()
    }

    fn positions(neighbors: &[Neighbor]) -> Vec<usize> {
        neighbors.iter().map(|n| n.position.index()).collect()
    }

    #[test]
    fn test_rank_descending_without_self() {
        let m = matrix(vec![
            vec![1.0, 0.8, 0.2],
            vec![0.8, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ]);
        let ranked = Ranker::new().rank(&m, Position::new(0));
        assert_eq!(positions(&ranked), vec![1, 2]);
        assert!((ranked[0].score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_caps_at_limit() {
        let n = 8;
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 1.0 } else { 0.9 / (1.0 + f64::from(j)) })
                    .collect()
            })
            .collect();
        let ranked = Ranker::new().rank(&matrix(rows), Position::new(7));
        assert_eq!(positions(&ranked), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_ties_keep_catalog_order() {
        let m = matrix(vec![
            vec![1.0, 0.4, 0.7, 0.4, 0.7],
            vec![0.4, 1.0, 0.0, 0.0, 0.0],
            vec![0.7, 0.0, 1.0, 0.0, 0.0],
            vec![0.4, 0.0, 0.0, 1.0, 0.0],
            vec![0.7, 0.0, 0.0, 0.0, 1.0],
        ]);
        let ranked = Ranker::new().rank(&m, Position::new(0));
        assert_eq!(positions(&ranked), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_rank_drops_first_slot_even_when_not_self() {
        // Position 0 ties its own maximum, so it sorts ahead of row 1's
        // self entry and is the slot that gets dropped.
        let m = matrix(vec![
            vec![1.0, 1.0, 0.5],
            vec![1.0, 1.0, 0.5],
            vec![0.5, 0.5, 1.0],
        ]);
        let ranked = Ranker::new().rank(&m, Position::new(1));
        assert_eq!(positions(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_rank_single_entry_catalog() {
        let ranked = Ranker::new().rank(&matrix(vec![vec![1.0]]), Position::new(0));
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_unknown_position() {
        let ranked = Ranker::new().rank(&matrix(vec![vec![1.0]]), Position::new(3));
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_custom_limit() {
        let m = matrix(vec![
            vec![1.0, 0.8, 0.2],
            vec![0.8, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ]);
        let ranked = Ranker::with_limit(1).unwrap().rank(&m, Position::new(0));
        assert_eq!(positions(&ranked), vec![1]);
        assert_eq!(Ranker::with_limit(0), Err(SearchError::InvalidLimit));
    }
}
