//! # tunerank
//!
//! A content-based music recommendation engine.
//!
//! tunerank ranks a pool of candidate tracks or playlists against a listener's
//! taste profile. Tracks become audio feature vectors and TF-IDF text vectors,
//! features are scaled against a reference population, cosine similarity
//! signals are blended with fixed weights and the result is filtered and
//! truncated into an explainable top-K list.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! tunerank profile --history history.json --pool pool.json --preset discovery
//! tunerank playlists --input playlists.json --preset playlist-hybrid
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use tunerank::prelude::*;
//! use serde_json::json;
//!
//! let pool: Vec<Item> = vec![
//!     Item::from_value(json!({"id": "t1", "title": "Rain", "tempo": 80, "energy": 0.2})),
//!     Item::from_value(json!({"id": "t2", "title": "Storm", "tempo": 170, "energy": 0.9})),
//!     Item::from_value(json!({"id": "t3", "title": "Mist", "tempo": 85, "energy": 0.3})),
//! ];
//! let history = vec![TrackRecord::from_value(json!({"id": "t1", "tempo": 82, "energy": 0.25}))];
//!
//! let recommender = Recommender::new(RecommenderConfig::discovery()).unwrap();
//! let fitted = recommender.fit(pool).unwrap();
//! let recs = recommender.recommend_for_profile(&fitted, &history).unwrap();
//!
//! // t1 is already known
//! assert!(recs.entries.iter().all(|e| e.id.as_deref() != Some("t1")));
//! ```
//!
//! ## Crate Structure
//!
//! - `tunerank-core` - Records, feature extraction, TF-IDF, scaling, vectors
//! - `tunerank-similarity` - Cosine similarity, signal blending, ranking, explanations

pub mod config;
pub mod loader;
pub mod recommender;
pub mod report;

// Re-export core types
pub use tunerank_core::{
    EligibilityRule, Error, FeatureExtractor, FeatureSet, FittedScaler, FittedTfidf, Item,
    Playlist, Result, ScalerKind, SparseVector, TfidfVectorizer, TrackRecord, Vector,
};

// Re-export similarity
pub use tunerank_similarity::{
    HybridScorer, QueryContext, Ranker, RecommendationEntry, RecommendationStats,
    Recommendations, SignalWeights, SimilarityMatrix,
};

pub use config::{Preset, RecommenderConfig, SignalMode};
pub use recommender::{FittedPool, Recommender};
pub use report::{OutputFormat, ReportStyle, Reporter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EligibilityRule, Error, FeatureSet, FittedPool, Item, OutputFormat, Preset,
        Recommendations, Recommender, RecommenderConfig, ReportStyle, Reporter, Result,
        ScalerKind, SignalMode, TrackRecord,
    };
}
