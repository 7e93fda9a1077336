//! # tunerank Similarity
//!
//! Scoring and ranking for the tunerank recommendation engine.
//!
//! This crate compares query vectors against a candidate pool, blends the
//! resulting similarity signals and turns them into explainable rankings.
//!
//! ## Features
//!
//! - **Cosine Similarity**: One code path for dense and sparse vectors, zero-safe
//! - **Signal Weights**: Declarative weight table, validated and normalized
//! - **Hybrid Blending**: Named signal producers combined with fixed weights
//! - **Ranking**: Stable sort, self-exclusion, eligibility and discovery filters, top-K
//! - **Explainability**: Per-signal contribution breakdown for every entry
//!
//! ## Example
//!
//! ```rust
//! use tunerank_similarity::{
//!     CosineSignal, HybridScorer, QueryContext, Ranker, SignalWeights, FEATURE_SIGNAL, TEXT_SIGNAL,
//! };
//! use tunerank_core::{Item, SparseVector, Vector};
//! use serde_json::json;
//!
//! let pool = vec![
//!     Item::from_value(json!({"id": "a"})),
//!     Item::from_value(json!({"id": "b"})),
//! ];
//! let query_text = vec![SparseVector::from_pairs(2, vec![(0, 1.0)])];
//! let pool_text = vec![
//!     SparseVector::from_pairs(2, vec![(0, 1.0)]),
//!     SparseVector::from_pairs(2, vec![(1, 1.0)]),
//! ];
//! let query_feat = vec![Vector::new(vec![0.2, 0.8])];
//! let pool_feat = vec![Vector::new(vec![0.9, 0.1]), Vector::new(vec![0.2, 0.8])];
//!
//! let scorer = HybridScorer::new(SignalWeights::hybrid(0.5).unwrap()).unwrap();
//! let text = CosineSignal::new(TEXT_SIGNAL, &query_text, &pool_text);
//! let features = CosineSignal::new(FEATURE_SIGNAL, &query_feat, &pool_feat);
//! let blended = scorer.score(&[&text, &features]).unwrap();
//!
//! let ranking = Ranker::new(1)
//!     .rank(&pool, &blended.row(0), &QueryContext::default())
//!     .unwrap();
//! assert_eq!(ranking.results.len(), 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Signals   │────>│   Hybrid    │────>│   Ranker    │
//! │ (text, feat)│     │   Scorer    │     │  (filters)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲                   │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Signal    │     │  Explain    │
//!                     │   Weights   │     │  (entries)  │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod distance;
pub mod error;
pub mod explain;
pub mod rerank;
pub mod schema;
pub mod signal;

// Re-export main types for convenience
pub use distance::{cosine_scores, cosine_similarity, SimilarityMatrix};
pub use error::{Result, SimilarityError};
pub use explain::{
    QuerySummary, RecommendationEntry, RecommendationStats, Recommendations, Vibe, TOP_TRACKS,
};
pub use rerank::{QueryContext, RankedResult, Ranker, Ranking, DEFAULT_TOP_K};
pub use schema::{SchemaError, SignalWeights, DEFAULT_ALPHA, FEATURE_SIGNAL, TEXT_SIGNAL};
pub use signal::{BlendedScores, CosineSignal, HybridScorer, MatrixSignal, ScoreRow, SignalProducer};
