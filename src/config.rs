//! Recommender configuration
//!
//! Every tunable constant of the pipeline lives in [`RecommenderConfig`].
//! It deserializes from JSON with per-field defaults, so a config file only
//! needs the keys it changes.

use serde::{Deserialize, Serialize};
use tunerank_core::{EligibilityRule, Error, FeatureSet, Result, ScalerKind, DEFAULT_MAX_FEATURES};
use tunerank_similarity::{SignalWeights, DEFAULT_ALPHA, DEFAULT_TOP_K, FEATURE_SIGNAL, TEXT_SIGNAL};

/// Which similarity signals take part in scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    /// TF-IDF text similarity only
    Text,
    /// Audio feature similarity only
    Features,
    /// `alpha * text + (1 - alpha) * features`
    #[default]
    Hybrid,
}

impl SignalMode {
    pub fn uses_text(self) -> bool {
        matches!(self, SignalMode::Text | SignalMode::Hybrid)
    }
}

impl std::str::FromStr for SignalMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(SignalMode::Text),
            "features" | "audio" => Ok(SignalMode::Features),
            "hybrid" => Ok(SignalMode::Hybrid),
            other => Err(Error::InvalidConfig(format!("unknown signal mode '{}'", other))),
        }
    }
}

/// Named configurations matching the supported recommendation workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Discovery,
    PlaylistText,
    PlaylistHybrid,
    PlaylistFeatures,
}

impl Preset {
    pub fn config(self) -> RecommenderConfig {
        match self {
            Preset::Discovery => RecommenderConfig::discovery(),
            Preset::PlaylistText => RecommenderConfig::playlist_text(),
            Preset::PlaylistHybrid => RecommenderConfig::playlist_hybrid(),
            Preset::PlaylistFeatures => RecommenderConfig::playlist_features(),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "discovery" => Ok(Preset::Discovery),
            "playlist-text" => Ok(Preset::PlaylistText),
            "playlist-hybrid" => Ok(Preset::PlaylistHybrid),
            "playlist-features" => Ok(Preset::PlaylistFeatures),
            other => Err(Error::InvalidConfig(format!("unknown preset '{}'", other))),
        }
    }
}

/// Configuration of one recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub feature_set: FeatureSet,
    pub scaler: ScalerKind,
    pub signals: SignalMode,
    /// Text weight of the hybrid blend, in [0, 1]
    pub alpha: f32,
    pub top_k: usize,
    /// Vocabulary cap of the text vectorizer
    pub max_text_features: usize,
    /// Drop candidates the query already knows
    pub discovery: bool,
    /// Which items may query and which may be recommended
    pub eligibility: Option<EligibilityRule>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            feature_set: FeatureSet::Audio,
            scaler: ScalerKind::MinMax,
            signals: SignalMode::Hybrid,
            alpha: DEFAULT_ALPHA,
            top_k: DEFAULT_TOP_K,
            max_text_features: DEFAULT_MAX_FEATURES,
            discovery: true,
            eligibility: None,
        }
    }
}

impl RecommenderConfig {
    /// Listening-history profile against a global track pool
    pub fn discovery() -> Self {
        Self {
            feature_set: FeatureSet::AudioWithPopularity,
            scaler: ScalerKind::Standard,
            signals: SignalMode::Features,
            top_k: 20,
            discovery: true,
            ..Self::default()
        }
    }

    /// Personal playlists against platform playlists by text
    pub fn playlist_text() -> Self {
        Self {
            signals: SignalMode::Text,
            top_k: 5,
            discovery: false,
            eligibility: Some(EligibilityRule::personal_to_platform()),
            ..Self::default()
        }
    }

    /// Personal playlists against platform playlists, text and audio blended
    pub fn playlist_hybrid() -> Self {
        Self {
            signals: SignalMode::Hybrid,
            top_k: 3,
            discovery: false,
            eligibility: Some(EligibilityRule::personal_to_platform()),
            ..Self::default()
        }
    }

    /// Personal playlists against platform playlists by audio features
    pub fn playlist_features() -> Self {
        Self {
            signals: SignalMode::Features,
            top_k: 3,
            discovery: false,
            eligibility: Some(EligibilityRule::personal_to_platform()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".to_string()));
        }
        if self.max_text_features == 0 {
            return Err(Error::InvalidConfig(
                "max_text_features must be positive".to_string(),
            ));
        }
        if let Some(rule) = &self.eligibility {
            if rule.field.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "eligibility field cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Signal weights implied by the signal mode and alpha
    pub fn weights(&self) -> Result<SignalWeights> {
        match self.signals {
            SignalMode::Text => Ok(SignalWeights::single(TEXT_SIGNAL)),
            SignalMode::Features => Ok(SignalWeights::single(FEATURE_SIGNAL)),
            SignalMode::Hybrid => SignalWeights::hybrid(self.alpha)
                .map_err(|e| Error::InvalidConfig(e.to_string())),
        }
    }
}
