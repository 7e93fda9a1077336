//! Cosine similarity and similarity matrices
//!
//! All functions work on anything implementing [`Embedding`], so dense audio
//! feature vectors and sparse TF-IDF rows share one code path.
//! Scores lie in [-1.0, 1.0]; a zero-magnitude side scores 0.0, never NaN.

use crate::error::{Result, SimilarityError};
use tunerank_core::Embedding;

/// Cosine similarity between two vectors of equal dimension
///
/// # Returns
/// `dot(a, b) / (|a| * |b|)`, or 0.0 when either vector has zero magnitude
pub fn cosine_similarity<E: Embedding>(a: &E, b: &E) -> Result<f32> {
    if a.dim() != b.dim() {
        return Err(SimilarityError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }

    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let sim = a.dot(b) / (norm_a * norm_b);
    if sim.is_finite() {
        // rounding can push parallel vectors a hair past 1.0
        Ok(sim.clamp(-1.0, 1.0))
    } else {
        Ok(0.0)
    }
}

/// Scores of one query against every candidate
pub fn cosine_scores<E: Embedding>(query: &E, candidates: &[E]) -> Result<Vec<f32>> {
    candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate))
        .collect()
}

/// Dense query-by-candidate score matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(row) = rows.iter().find(|r| r.len() != cols) {
            return Err(SimilarityError::DimensionMismatch {
                expected: cols,
                actual: row.len(),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Cosine similarity of every query against every candidate
    pub fn cosine<E: Embedding>(queries: &[E], candidates: &[E]) -> Result<Self> {
        let rows = queries
            .iter()
            .map(|q| cosine_scores(q, candidates))
            .collect::<Result<Vec<_>>>()?;
        let mut matrix = Self::from_rows(rows)?;
        matrix.cols = candidates.len();
        Ok(matrix)
    }

    /// Pairwise similarity of a collection with itself
    pub fn pairwise<E: Embedding>(items: &[E]) -> Result<Self> {
        Self::cosine(items, items)
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// `self += weight * other`, shapes must match
    pub fn add_scaled(&mut self, other: &SimilarityMatrix, weight: f32) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.cols,
                actual: other.cols,
            });
        }
        for (acc, v) in self.data.iter_mut().zip(other.data.iter()) {
            *acc += weight * v;
        }
        Ok(())
    }

    /// Copy with every score multiplied by `weight`
    pub fn scaled(&self, weight: f32) -> SimilarityMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * weight).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunerank_core::{SparseVector, Vector};

    #[test]
    fn test_identical_vectors() {
        let a = Vector::new(vec![0.3, 0.9, 120.0]);
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        let x = Vector::new(vec![1.0, 0.0]);
        let y = Vector::new(vec![0.0, 1.0]);
        let neg = Vector::new(vec![-1.0, 0.0]);
        assert_eq!(cosine_similarity(&x, &y).unwrap(), 0.0);
        assert!((cosine_similarity(&x, &neg).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetry() {
        let a = Vector::new(vec![0.1, -0.4, 2.5, 0.0]);
        let b = Vector::new(vec![1.2, 0.3, -0.7, 0.9]);
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = Vector::zeros(3);
        let a = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(cosine_similarity(&zero, &a).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(SimilarityError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_sparse_cosine() {
        let a = SparseVector::from_pairs(4, vec![(0, 1.0), (3, 1.0)]);
        let b = SparseVector::from_pairs(4, vec![(0, 1.0)]);
        let expected = 1.0 / 2.0f32.sqrt();
        assert!((cosine_similarity(&a, &b).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_pairwise_matrix() {
        let items = vec![
            Vector::new(vec![1.0, 0.0]),
            Vector::new(vec![0.0, 1.0]),
            Vector::new(vec![1.0, 1.0]),
        ];
        let m = SimilarityMatrix::pairwise(&items).unwrap();
        assert_eq!(m.shape(), (3, 3));
        for i in 0..3 {
            assert!((m.get(i, i) - 1.0).abs() < 1e-6);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_rectangular_matrix_with_no_candidates() {
        let queries = vec![Vector::new(vec![1.0])];
        let m = SimilarityMatrix::cosine(&queries, &[]).unwrap();
        assert_eq!(m.shape(), (1, 0));
        assert!(m.row(0).is_empty());
    }

    #[test]
    fn test_add_scaled() {
        let mut acc = SimilarityMatrix::zeros(1, 2);
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5]]).unwrap();
        acc.add_scaled(&m, 0.5).unwrap();
        assert_eq!(acc.row(0), &[0.5, 0.25]);
        assert!(acc.add_scaled(&SimilarityMatrix::zeros(2, 2), 1.0).is_err());
    }
}
