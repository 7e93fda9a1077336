//! Ranker for blended similarity scores
//!
//! Takes one query's score row over the whole candidate pool, drops the
//! candidates that may not be recommended and keeps the best `top_k`.
//! Exclusions apply in a fixed order: the query itself, then the eligibility
//! rule, then the discovery filter.

use crate::error::{Result, SimilarityError};
use crate::signal::ScoreRow;
use std::collections::{BTreeMap, HashSet};
use tunerank_core::{EligibilityRule, Item};

/// Default number of recommendations per query
pub const DEFAULT_TOP_K: usize = 10;

/// A surviving candidate with its score breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    /// Position of the candidate in the pool
    pub index: usize,
    /// Blended similarity score
    pub score: f32,
    /// Per-signal similarity scores (already weighted)
    pub signal_scores: BTreeMap<String, f32>,
}

/// What the ranker needs to know about the query
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Pool index of the query when it is a pool member
    pub self_index: Option<usize>,
    /// Identifiers the listener already knows
    pub known_ids: HashSet<String>,
}

impl QueryContext {
    /// Context of an external listening profile
    pub fn profile<I, S>(known_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            self_index: None,
            known_ids: known_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Context of a query drawn from the pool at `index`
    pub fn member(index: usize, item: &Item) -> Self {
        Self {
            self_index: Some(index),
            known_ids: item.known_ids().into_iter().collect(),
        }
    }
}

/// Ranked candidates plus how many were dropped and why
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub results: Vec<RankedResult>,
    /// Candidates that passed every filter, before truncation
    pub candidates: usize,
    pub excluded_self: usize,
    pub excluded_ineligible: usize,
    pub excluded_known: usize,
}

/// Filter, sort and truncate one query's scores
#[derive(Debug, Clone)]
pub struct Ranker {
    top_k: usize,
    discovery: bool,
    rule: Option<EligibilityRule>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl Ranker {
    /// Create a ranker keeping at most `top_k` results, no filters besides self-exclusion
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            discovery: false,
            rule: None,
        }
    }

    /// Drop candidates whose identifier the query already knows
    pub fn with_discovery(mut self, discovery: bool) -> Self {
        self.discovery = discovery;
        self
    }

    /// Only recommend candidates that are targets under `rule`
    pub fn with_rule(mut self, rule: Option<EligibilityRule>) -> Self {
        self.rule = rule;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Rank every candidate of `pool` for one query
    ///
    /// # Arguments
    /// * `pool` - The candidate pool, in its canonical order
    /// * `scores` - Blended scores, one per pool member
    /// * `ctx` - Query identity and known identifiers
    ///
    /// # Returns
    /// At most `top_k` results, best first; equal scores keep pool order
    pub fn rank(&self, pool: &[Item], scores: &ScoreRow, ctx: &QueryContext) -> Result<Ranking> {
        if scores.len() != pool.len() {
            return Err(SimilarityError::DimensionMismatch {
                expected: pool.len(),
                actual: scores.len(),
            });
        }

        let mut ranking = Ranking::default();
        let mut results = Vec::with_capacity(pool.len());

        for (index, (item, &score)) in pool.iter().zip(scores.total.iter()).enumerate() {
            if ctx.self_index == Some(index) {
                ranking.excluded_self += 1;
                continue;
            }
            if let Some(rule) = &self.rule {
                if !rule.is_target(item) {
                    ranking.excluded_ineligible += 1;
                    continue;
                }
            }
            if self.discovery && item.id().is_some_and(|id| ctx.known_ids.contains(&id)) {
                ranking.excluded_known += 1;
                continue;
            }
            results.push(RankedResult {
                index,
                score,
                signal_scores: scores.contributions_at(index),
            });
        }

        ranking.candidates = results.len();

        // sort_by is stable: ties keep pool order
        results.sort_by(|a, b| {
            b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.top_k);

        tracing::debug!(
            kept = results.len(),
            candidates = ranking.candidates,
            excluded_self = ranking.excluded_self,
            excluded_ineligible = ranking.excluded_ineligible,
            excluded_known = ranking.excluded_known,
            "ranked candidates"
        );

        ranking.results = results;
        Ok(ranking)
    }
}
