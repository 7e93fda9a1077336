//! # tunerank Core
//!
//! Core library for the tunerank recommendation engine.
//!
//! This crate turns raw listening data into comparable vectors:
//!
//! - [`TrackRecord`] / [`Item`] - Flexible key/value records for tracks and playlists
//! - [`FeatureExtractor`] - Fixed-order audio feature vectors and playlist means
//! - [`TfidfVectorizer`] - Sparse TF-IDF rows with a capped vocabulary
//! - [`ScalerKind`] / [`FittedScaler`] - Min-max and standard scaling, fit once
//! - [`Vector`] / [`SparseVector`] - Dense and sparse vectors sharing [`Embedding`]
//!
//! ## Example
//!
//! ```rust
//! use tunerank_core::{FeatureExtractor, ScalerKind, TrackRecord};
//! use serde_json::json;
//!
//! let extractor = FeatureExtractor::default();
//! let pool: Vec<_> = [json!({"tempo": 90, "energy": 0.3}), json!({"tempo": 150, "energy": 0.9})]
//!     .into_iter()
//!     .map(|v| extractor.extract(&TrackRecord::from_value(v)))
//!     .collect();
//!
//! let scaler = ScalerKind::MinMax.fit(&pool, extractor.dim()).unwrap();
//! let scaled = scaler.transform(&pool[1]).unwrap();
//! assert_eq!(scaled.as_slice()[0], 1.0);
//! ```

pub mod error;
pub mod features;
pub mod normalize;
pub mod record;
pub mod text;
pub mod vector;

pub use error::{Error, Result};
pub use features::{Feature, FeatureExtractor, FeatureSet, FEATURE_ALIASES};
pub use normalize::{FittedScaler, ScalerKind};
pub use record::{EligibilityRule, Item, Playlist, TrackRecord};
pub use text::{FittedTfidf, TfidfVectorizer, DEFAULT_MAX_FEATURES, ENGLISH_STOP_WORDS};
pub use vector::{Embedding, SparseVector, Vector};
