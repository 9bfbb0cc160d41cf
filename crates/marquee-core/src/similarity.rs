//! The similarity index: a square matrix of precomputed scores.

use crate::error::{Error, Result};
use crate::model::Position;

/// Row-major N×N matrix of similarity scores.
///
/// Row `i` corresponds to catalog position `i`. Construction rejects ragged
/// rows and non-finite scores, so every row can be totally ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedMatrix`] if any row length differs from the
    /// number of rows, or [`Error::NonFiniteScore`] for NaN or infinite
    /// entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        let mut scores = Vec::with_capacity(dim * dim);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dim {
                return Err(Error::RaggedMatrix {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteScore { row, col });
            }
            scores.extend(values);
        }
        Ok(Self { dim, scores })
    }

    /// Number of rows (equal to the number of columns).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Scores for `position` against every catalog entry, in position order.
    #[must_use]
    pub fn row(&self, position: Position) -> Option<&[f64]> {
        let i = position.index();
        if i >= self.dim {
            return None;
        }
        Some(&self.scores[i * self.dim..(i + 1) * self.dim])
    }

    #[must_use]
    pub fn score(&self, a: Position, b: Position) -> Option<f64> {
        self.row(a).and_then(|row| row.get(b.index()).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_square() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 0.3], vec![0.3, 1.0]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.row(Position::new(1)), Some(&[0.3, 1.0][..]));
        assert_eq!(m.score(Position::new(0), Position::new(1)), Some(0.3));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.3], vec![0.3]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_from_rows_rejects_nan() {
        let err =
            SimilarityMatrix::from_rows(vec![vec![1.0, f64::NAN], vec![0.3, 1.0]]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteScore { row: 0, col: 1 }));
    }

    #[test]
    fn test_row_out_of_range() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(m.row(Position::new(1)).is_none());
    }

    #[test]
    fn test_empty_matrix() {
        let m = SimilarityMatrix::from_rows(Vec::new()).unwrap();
        assert_eq!(m.dim(), 0);
    }
}
