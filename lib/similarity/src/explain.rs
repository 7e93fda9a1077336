//! Explainable recommendation output
//!
//! Turns a [`Ranking`] back into something a person can read: who the
//! candidate is, its rank and score, how much each signal contributed and
//! what the candidate sounds like on average.

use crate::error::{Result, SimilarityError};
use crate::rerank::Ranking;
use serde::Serialize;
use std::collections::BTreeMap;
use tunerank_core::{Feature, FeatureSet, Item, Vector};

/// Number of track labels shown per playlist candidate
pub const TOP_TRACKS: usize = 3;

/// Average tempo, energy and valence of an item
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Vibe {
    pub tempo: f32,
    pub energy: f32,
    pub valence: f32,
}

impl Vibe {
    /// Read the vibe out of an unscaled feature vector
    pub fn from_vector(set: FeatureSet, raw: &Vector) -> Self {
        let at = |feature: Feature| {
            set.position(feature)
                .and_then(|i| raw.as_slice().get(i).copied())
                .unwrap_or(0.0)
        };
        Self {
            tempo: at(Feature::Tempo),
            energy: at(Feature::Energy),
            valence: at(Feature::Valence),
        }
    }
}

/// One recommended candidate
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationEntry {
    /// 1-based rank
    pub rank: usize,
    /// Position in the candidate pool
    pub index: usize,
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub score: f32,
    /// Weighted contribution per signal; sums to `score`
    pub signals: BTreeMap<String, f32>,
    pub vibe: Vibe,
    /// `"title - artist"` of the first tracks of a playlist candidate
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_tracks: Vec<String>,
}

/// Who the recommendations are for
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuerySummary {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Tracks the query profile was built from
    pub tracks: usize,
    pub vibe: Vibe,
}

/// Summary of one ranking run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationStats {
    pub pool_size: usize,
    pub candidates_count: usize,
    pub results_count: usize,
    pub avg_score: f32,
    pub best_score: f32,
    pub excluded_self: usize,
    pub excluded_ineligible: usize,
    pub excluded_known: usize,
    /// Signal with the largest total contribution across the results
    pub top_contributing_signal: Option<String>,
}

impl RecommendationStats {
    fn compute(pool_size: usize, ranking: &Ranking, entries: &[RecommendationEntry]) -> Self {
        let results_count = entries.len();
        let (avg_score, best_score) = if entries.is_empty() {
            (0.0, 0.0)
        } else {
            let sum: f32 = entries.iter().map(|e| e.score).sum();
            (sum / results_count as f32, entries[0].score)
        };

        let mut totals: BTreeMap<&str, f32> = BTreeMap::new();
        for entry in entries {
            for (name, score) in &entry.signals {
                *totals.entry(name.as_str()).or_insert(0.0) += score;
            }
        }
        // first signal in name order wins a tie
        let top_contributing_signal = totals
            .into_iter()
            .fold(None::<(&str, f32)>, |best, (name, total)| match best {
                Some((_, b)) if b >= total => best,
                _ => Some((name, total)),
            })
            .map(|(name, _)| name.to_string());

        Self {
            pool_size,
            candidates_count: ranking.candidates,
            results_count,
            avg_score,
            best_score,
            excluded_self: ranking.excluded_self,
            excluded_ineligible: ranking.excluded_ineligible,
            excluded_known: ranking.excluded_known,
            top_contributing_signal,
        }
    }
}

/// Full answer for one query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendations {
    pub query: QuerySummary,
    pub entries: Vec<RecommendationEntry>,
    pub stats: RecommendationStats,
}

impl Recommendations {
    /// Attach candidate details to a ranking
    ///
    /// `raw` holds the unscaled feature vector of every pool member.
    pub fn build(
        query: QuerySummary,
        ranking: &Ranking,
        pool: &[Item],
        raw: &[Vector],
        feature_set: FeatureSet,
    ) -> Result<Self> {
        if raw.len() != pool.len() {
            return Err(SimilarityError::DimensionMismatch {
                expected: pool.len(),
                actual: raw.len(),
            });
        }

        let entries = ranking
            .results
            .iter()
            .enumerate()
            .map(|(position, result)| {
                let item = pool.get(result.index).ok_or(SimilarityError::DimensionMismatch {
                    expected: pool.len(),
                    actual: result.index + 1,
                })?;
                let top_tracks = if item.is_playlist() {
                    item.tracks()
                        .iter()
                        .take(TOP_TRACKS)
                        .map(|t| t.label())
                        .collect()
                } else {
                    Vec::new()
                };
                Ok(RecommendationEntry {
                    rank: position + 1,
                    index: result.index,
                    id: item.id(),
                    title: item.title(),
                    artist: item.artist(),
                    genre: item.genre(),
                    score: result.score,
                    signals: result.signal_scores.clone(),
                    vibe: Vibe::from_vector(feature_set, &raw[result.index]),
                    top_tracks,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let stats = RecommendationStats::compute(pool.len(), ranking, &entries);
        Ok(Self {
            query,
            entries,
            stats,
        })
    }
}
