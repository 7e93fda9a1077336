use crate::schema::SchemaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors raised while scoring, blending or ranking
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("Invalid signal weights: {0}")]
    Schema(#[from] SchemaError),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Signal '{signal}' has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        signal: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Signal '{0}' is weighted but was not supplied")]
    MissingSignal(String),

    #[error("Signal '{0}' was supplied but has no weight")]
    UnknownSignal(String),
}

impl From<SimilarityError> for tunerank_core::Error {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::DimensionMismatch { expected, actual } => {
                tunerank_core::Error::DimensionMismatch { expected, actual }
            }
            SimilarityError::ShapeMismatch { expected, actual, .. } => {
                tunerank_core::Error::DimensionMismatch {
                    expected: expected.1,
                    actual: actual.1,
                }
            }
            other => tunerank_core::Error::InvalidConfig(other.to_string()),
        }
    }
}
