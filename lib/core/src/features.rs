//! Audio feature extraction
//!
//! Maps a [`TrackRecord`] to a fixed-order numeric vector and aggregates
//! track vectors into playlist or profile vectors by arithmetic mean.
//! Extraction never fails: absent or unparseable values become `0.0`.

use crate::record::{Item, TrackRecord};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single audio feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Tempo,
    Energy,
    Valence,
    Danceability,
    Acousticness,
    Instrumentalness,
    Popularity,
}

impl Feature {
    /// Canonical key followed by the accepted aliases, in lookup order
    pub fn aliases(self) -> &'static [&'static str] {
        FEATURE_ALIASES
            .iter()
            .find(|(feature, _)| *feature == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }

    pub fn name(self) -> &'static str {
        self.aliases().first().copied().unwrap_or("")
    }
}

/// Declarative field-alias table: canonical name first
pub const FEATURE_ALIASES: &[(Feature, &[&str])] = &[
    (Feature::Tempo, &["tempo", "Tempo (BPM)", "Tempo", "bpm"]),
    (Feature::Energy, &["energy", "Energy"]),
    (Feature::Valence, &["valence", "Valence"]),
    (Feature::Danceability, &["danceability", "Danceability"]),
    (Feature::Acousticness, &["acousticness", "Acousticness"]),
    (Feature::Instrumentalness, &["instrumentalness", "Instrumentalness"]),
    (Feature::Popularity, &["popularity", "Popularity"]),
];

const AUDIO: &[Feature] = &[
    Feature::Tempo,
    Feature::Energy,
    Feature::Valence,
    Feature::Danceability,
    Feature::Acousticness,
    Feature::Instrumentalness,
];

const AUDIO_WITH_POPULARITY: &[Feature] = &[
    Feature::Tempo,
    Feature::Energy,
    Feature::Valence,
    Feature::Danceability,
    Feature::Acousticness,
    Feature::Instrumentalness,
    Feature::Popularity,
];

/// Which features make up a vector, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// tempo, energy, valence, danceability, acousticness, instrumentalness
    #[default]
    Audio,
    /// the audio features followed by popularity
    AudioWithPopularity,
}

impl FeatureSet {
    pub fn features(self) -> &'static [Feature] {
        match self {
            FeatureSet::Audio => AUDIO,
            FeatureSet::AudioWithPopularity => AUDIO_WITH_POPULARITY,
        }
    }

    #[inline]
    pub fn dim(self) -> usize {
        self.features().len()
    }

    /// Position of `feature` in vectors of this set
    pub fn position(self, feature: Feature) -> Option<usize> {
        self.features().iter().position(|f| *f == feature)
    }
}

/// Converts records into feature vectors for one [`FeatureSet`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    set: FeatureSet,
}

impl FeatureExtractor {
    pub fn new(set: FeatureSet) -> Self {
        Self { set }
    }

    #[inline]
    pub fn feature_set(&self) -> FeatureSet {
        self.set
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.set.dim()
    }

    /// Feature vector of a single track
    pub fn extract(&self, record: &TrackRecord) -> Vector {
        Vector::new(
            self.set
                .features()
                .iter()
                .map(|feature| {
                    record
                        .lookup(feature.aliases())
                        .map(parse_feature)
                        .unwrap_or(0.0)
                })
                .collect(),
        )
    }

    /// Mean vector over `tracks`; zero vector when there are none
    pub fn aggregate(&self, tracks: &[TrackRecord]) -> Vector {
        let rows: Vec<Vector> = tracks.iter().map(|t| self.extract(t)).collect();
        Vector::mean(&rows, self.dim())
    }

    /// Vector of a pool item: a track's own vector, or its playlist mean
    pub fn extract_item(&self, item: &Item) -> Vector {
        match item {
            Item::Track(t) => self.extract(t),
            Item::Playlist(p) => self.aggregate(&p.tracks),
        }
    }
}

/// Convert a raw value to a feature; malformed values degrade to `0.0`
pub fn parse_feature(value: &Value) -> f32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed.map(|v| v as f32) {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
