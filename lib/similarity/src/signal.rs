//! Named similarity signals and their weighted blend
//!
//! A signal produces a query-by-candidate [`SimilarityMatrix`]. The
//! [`HybridScorer`] looks each signal up by name in its [`SignalWeights`] and
//! sums the weighted matrices. New signals only need a [`SignalProducer`]
//! implementation; ranking is unaffected.

use crate::distance::SimilarityMatrix;
use crate::error::{Result, SimilarityError};
use crate::schema::SignalWeights;
use std::collections::BTreeMap;
use tunerank_core::Embedding;

/// A source of similarity scores for a fixed set of queries and candidates
pub trait SignalProducer {
    fn name(&self) -> &str;

    fn compute(&self) -> Result<SimilarityMatrix>;
}

/// Cosine similarity in one vector space
pub struct CosineSignal<'a, E: Embedding> {
    name: String,
    queries: &'a [E],
    candidates: &'a [E],
}

impl<'a, E: Embedding> CosineSignal<'a, E> {
    pub fn new(name: impl Into<String>, queries: &'a [E], candidates: &'a [E]) -> Self {
        Self {
            name: name.into(),
            queries,
            candidates,
        }
    }
}

impl<E: Embedding> SignalProducer for CosineSignal<'_, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self) -> Result<SimilarityMatrix> {
        SimilarityMatrix::cosine(self.queries, self.candidates)
    }
}

/// Precomputed scores exposed as a signal
pub struct MatrixSignal {
    name: String,
    matrix: SimilarityMatrix,
}

impl MatrixSignal {
    pub fn new(name: impl Into<String>, matrix: SimilarityMatrix) -> Self {
        Self {
            name: name.into(),
            matrix,
        }
    }
}

impl SignalProducer for MatrixSignal {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self) -> Result<SimilarityMatrix> {
        Ok(self.matrix.clone())
    }
}

/// Blended scores plus each signal's weighted contribution
#[derive(Debug, Clone)]
pub struct BlendedScores {
    pub total: SimilarityMatrix,
    /// Weighted matrices per signal, keyed by name
    pub contributions: BTreeMap<String, SimilarityMatrix>,
}

impl BlendedScores {
    /// Scores of one query row
    pub fn row(&self, row: usize) -> ScoreRow {
        ScoreRow {
            total: self.total.row(row).to_vec(),
            contributions: self
                .contributions
                .iter()
                .map(|(name, m)| (name.clone(), m.row(row).to_vec()))
                .collect(),
        }
    }
}

/// Scores of a single query against every candidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreRow {
    pub total: Vec<f32>,
    pub contributions: BTreeMap<String, Vec<f32>>,
}

impl ScoreRow {
    /// A row without per-signal breakdown
    pub fn from_total(total: Vec<f32>) -> Self {
        Self {
            total,
            contributions: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.total.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// Weighted contribution of every signal to candidate `index`
    pub fn contributions_at(&self, index: usize) -> BTreeMap<String, f32> {
        self.contributions
            .iter()
            .filter_map(|(name, scores)| scores.get(index).map(|s| (name.clone(), *s)))
            .collect()
    }
}

/// Fixed-weight linear blend of named signals
#[derive(Debug, Clone)]
pub struct HybridScorer {
    weights: SignalWeights,
}

impl HybridScorer {
    /// Create a scorer; weights are validated and normalized
    pub fn new(mut weights: SignalWeights) -> Result<Self> {
        weights.validate_and_normalize()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &SignalWeights {
        &self.weights
    }

    /// Compute every signal and blend them.
    ///
    /// Every weighted signal must be supplied exactly once and all matrices
    /// must share one shape.
    pub fn score(&self, signals: &[&dyn SignalProducer]) -> Result<BlendedScores> {
        for signal in signals {
            if !self.weights.contains(signal.name()) {
                return Err(SimilarityError::UnknownSignal(signal.name().to_string()));
            }
        }

        let mut contributions = BTreeMap::new();
        let mut total: Option<SimilarityMatrix> = None;

        // Accumulate in schema order so sums are reproducible
        for (name, weight) in &self.weights.signals {
            let signal = signals
                .iter()
                .find(|s| s.name() == name)
                .ok_or_else(|| SimilarityError::MissingSignal(name.clone()))?;
            let matrix = signal.compute()?;

            let (rows, cols) = matrix.shape();
            let acc = total.get_or_insert_with(|| SimilarityMatrix::zeros(rows, cols));
            if acc.shape() != matrix.shape() {
                return Err(SimilarityError::ShapeMismatch {
                    signal: name.clone(),
                    expected: acc.shape(),
                    actual: matrix.shape(),
                });
            }
            acc.add_scaled(&matrix, *weight)?;
            contributions.insert(name.clone(), matrix.scaled(*weight));
        }

        let total = total.ok_or_else(|| SimilarityError::MissingSignal("<none>".to_string()))?;
        tracing::debug!(
            signals = contributions.len(),
            queries = total.shape().0,
            candidates = total.shape().1,
            "blended similarity signals"
        );

        Ok(BlendedScores {
            total,
            contributions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FEATURE_SIGNAL, TEXT_SIGNAL};
    use tunerank_core::Vector;

    fn matrix(rows: Vec<Vec<f32>>) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_hybrid_blend() {
        let scorer = HybridScorer::new(SignalWeights::hybrid(0.25).unwrap()).unwrap();
        let text = MatrixSignal::new(TEXT_SIGNAL, matrix(vec![vec![1.0, 0.0]]));
        let feat = MatrixSignal::new(FEATURE_SIGNAL, matrix(vec![vec![0.0, 1.0]]));

        let blended = scorer.score(&[&text, &feat]).unwrap();
        assert_eq!(blended.total.row(0), &[0.25, 0.75]);

        let row = blended.row(0);
        assert_eq!(row.contributions_at(0)[TEXT_SIGNAL], 0.25);
        assert_eq!(row.contributions_at(1)[FEATURE_SIGNAL], 0.75);
    }

    #[test]
    fn test_alpha_extremes_select_one_signal() {
        let text = MatrixSignal::new(TEXT_SIGNAL, matrix(vec![vec![0.9, 0.1]]));
        let feat = MatrixSignal::new(FEATURE_SIGNAL, matrix(vec![vec![0.2, 0.6]]));

        let only_text = HybridScorer::new(SignalWeights::hybrid(1.0).unwrap()).unwrap();
        assert_eq!(only_text.score(&[&text, &feat]).unwrap().total.row(0), &[0.9, 0.1]);

        let only_feat = HybridScorer::new(SignalWeights::hybrid(0.0).unwrap()).unwrap();
        assert_eq!(only_feat.score(&[&text, &feat]).unwrap().total.row(0), &[0.2, 0.6]);
    }

    #[test]
    fn test_cosine_signal() {
        let queries = vec![Vector::new(vec![1.0, 0.0])];
        let candidates = vec![Vector::new(vec![2.0, 0.0]), Vector::new(vec![0.0, 3.0])];
        let signal = CosineSignal::new(FEATURE_SIGNAL, &queries, &candidates);

        let scorer = HybridScorer::new(SignalWeights::single(FEATURE_SIGNAL)).unwrap();
        let blended = scorer.score(&[&signal]).unwrap();
        assert_eq!(blended.total.shape(), (1, 2));
        assert!((blended.total.get(0, 0) - 1.0).abs() < 1e-6);
        assert_eq!(blended.total.get(0, 1), 0.0);
    }

    #[test]
    fn test_missing_and_unknown_signals() {
        let scorer = HybridScorer::new(SignalWeights::hybrid(0.5).unwrap()).unwrap();
        let text = MatrixSignal::new(TEXT_SIGNAL, matrix(vec![vec![1.0]]));
        assert!(matches!(
            scorer.score(&[&text]),
            Err(SimilarityError::MissingSignal(ref name)) if name == FEATURE_SIGNAL
        ));

        let other = MatrixSignal::new("collaborative", matrix(vec![vec![1.0]]));
        assert!(matches!(
            scorer.score(&[&text, &other]),
            Err(SimilarityError::UnknownSignal(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let scorer = HybridScorer::new(SignalWeights::hybrid(0.5).unwrap()).unwrap();
        let text = MatrixSignal::new(TEXT_SIGNAL, matrix(vec![vec![1.0, 0.0]]));
        let feat = MatrixSignal::new(FEATURE_SIGNAL, matrix(vec![vec![1.0, 0.0, 0.5]]));
        assert!(matches!(
            scorer.score(&[&text, &feat]),
            Err(SimilarityError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = SignalWeights::new(BTreeMap::from([(TEXT_SIGNAL.to_string(), 0.0)]));
        assert!(matches!(
            HybridScorer::new(weights),
            Err(SimilarityError::Schema(_))
        ));
    }
}
