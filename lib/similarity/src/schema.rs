//! Signal weight schema
//!
//! Declares which similarity signals take part in the blend and how much
//! each one counts. Weights are validated and normalized to sum to 1.0, so a
//! blend of cosine scores stays within [-1, 1].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the TF-IDF text signal
pub const TEXT_SIGNAL: &str = "text";

/// Name of the audio feature signal
pub const FEATURE_SIGNAL: &str = "features";

/// Default text weight of the hybrid blend
pub const DEFAULT_ALPHA: f32 = 0.5;

/// Signal weights version 1
///
/// Signals are kept in a sorted map so iteration order, and therefore every
/// floating point sum over signals, is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalWeights {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Weight per signal name
    pub signals: BTreeMap<String, f32>,
}

fn default_version() -> u32 {
    1
}

impl SignalWeights {
    /// Create a new schema with the given weights
    pub fn new(signals: BTreeMap<String, f32>) -> Self {
        Self {
            version: 1,
            signals,
        }
    }

    /// A schema with one signal at full weight
    pub fn single(name: &str) -> Self {
        Self::new(BTreeMap::from([(name.to_string(), 1.0)]))
    }

    /// `alpha * text + (1 - alpha) * features`
    pub fn hybrid(alpha: f32) -> Result<Self, SchemaError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(SchemaError::AlphaOutOfRange(alpha));
        }
        Ok(Self::new(BTreeMap::from([
            (TEXT_SIGNAL.to_string(), alpha),
            (FEATURE_SIGNAL.to_string(), 1.0 - alpha),
        ])))
    }

    /// Validate the schema
    /// - Checks that weights are finite and non-negative
    /// - Normalizes weights to sum to 1.0 if they don't
    pub fn validate_and_normalize(&mut self) -> Result<(), SchemaError> {
        if self.signals.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (name, weight) in &self.signals {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(SchemaError::NegativeWeight(name.clone()));
            }
        }

        let weight_sum: f32 = self.signals.values().sum();
        if weight_sum <= 0.0 {
            return Err(SchemaError::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 0.001 {
            for weight in self.signals.values_mut() {
                *weight /= weight_sum;
            }
        }

        Ok(())
    }

    /// Signal names in a deterministic order (sorted)
    pub fn signal_names(&self) -> Vec<&str> {
        self.signals.keys().map(String::as_str).collect()
    }

    pub fn weight(&self, name: &str) -> Option<f32> {
        self.signals.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.signals.contains_key(name)
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Signal '{0}' has a negative or non-finite weight")]
    NegativeWeight(String),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,

    #[error("Blend weight alpha must lie in [0, 1], got {0}")]
    AlphaOutOfRange(f32),
}
