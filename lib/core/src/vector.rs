use serde::{Deserialize, Serialize};

/// Common operations over dense and sparse vectors used by the similarity engine
pub trait Embedding {
    fn dim(&self) -> usize;

    fn dot(&self, other: &Self) -> f32;

    fn norm(&self) -> f32;
}

/// A dense vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Coordinate-wise arithmetic mean of `rows`.
    ///
    /// An empty slice yields the zero vector of `dim`, so every aggregate is
    /// defined regardless of how many rows contributed.
    pub fn mean(rows: &[Vector], dim: usize) -> Vector {
        if rows.is_empty() {
            return Vector::zeros(dim);
        }
        let mut sums = vec![0.0f64; dim];
        for row in rows {
            for (sum, v) in sums.iter_mut().zip(row.data.iter()) {
                *sum += f64::from(*v);
            }
        }
        let n = rows.len() as f64;
        let data = sums
            .into_iter()
            .map(|sum| {
                let mean = (sum / n) as f32;
                if mean.is_finite() {
                    mean
                } else {
                    0.0
                }
            })
            .collect();
        Vector::new(data)
    }
}

impl Embedding for Vector {
    #[inline]
    fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn dot(&self, other: &Vector) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }
}

/// A sparse vector stored as sorted `(index, value)` pairs
///
/// Used for term-weight rows where almost every vocabulary column is zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from unordered pairs; zero values are dropped and indices sorted.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.retain(|(_, v)| *v != 0.0);
        pairs.sort_by_key(|(i, _)| *i);
        let (indices, values) = pairs.into_iter().unzip();
        Self { dim, indices, values }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at column `index`, zero when absent
    pub fn get(&self, index: u32) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn to_dense(&self) -> Vector {
        let mut data = vec![0.0; self.dim];
        for (i, v) in self.indices.iter().zip(self.values.iter()) {
            data[*i as usize] = *v;
        }
        Vector::new(data)
    }
}

impl Embedding for SparseVector {
    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }

    /// Merge-join over the sorted index lists
    fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.values.iter().map(|x| x * x).sum::<f32>().sqrt()
    }
}
