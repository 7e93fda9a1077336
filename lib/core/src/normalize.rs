//! Per-column feature scaling
//!
//! Scaling is split into two explicit steps. [`ScalerKind::fit`] reads the
//! reference population once and returns an immutable [`FittedScaler`];
//! [`FittedScaler::transform`] is a pure function of those parameters and is
//! applied unchanged to the reference rows and to any query.

use crate::error::{Error, Result};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Scaling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalerKind {
    /// `(x - min) / (max - min)`, reference population mapped into [0, 1]
    #[default]
    MinMax,
    /// `(x - mean) / std` with the population standard deviation
    Standard,
}

impl std::str::FromStr for ScalerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "min-max" | "minmax" | "min_max" => Ok(ScalerKind::MinMax),
            "standard" | "z-score" | "zscore" => Ok(ScalerKind::Standard),
            other => Err(Error::InvalidConfig(format!("unknown scaler '{}'", other))),
        }
    }
}

impl ScalerKind {
    /// Compute per-column statistics over `reference`.
    ///
    /// Columns where every reference value is equal (or no rows at all) are
    /// degenerate: they transform to `0.0`. The fit still succeeds.
    pub fn fit(self, reference: &[Vector], dim: usize) -> Result<FittedScaler> {
        if let Some(row) = reference.iter().find(|r| r.dim() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: row.dim(),
            });
        }

        let mut columns = Vec::with_capacity(dim);
        for col in 0..dim {
            let values: Vec<f64> = reference
                .iter()
                .map(|r| f64::from(r.as_slice()[col]))
                .collect();
            columns.push(ColumnStats::compute(self, &values));
        }

        let fitted = FittedScaler {
            kind: self,
            n_samples: reference.len(),
            columns,
        };

        if fitted.is_degenerate() {
            tracing::warn!(
                samples = fitted.n_samples,
                dim,
                "reference population carries no signal, every scaled value is 0.0"
            );
        } else if fitted.degenerate_columns() > 0 {
            tracing::debug!(
                columns = fitted.degenerate_columns(),
                "constant reference columns scale to 0.0"
            );
        }

        Ok(fitted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ColumnStats {
    /// min for min-max, mean for standard
    offset: f64,
    /// max - min for min-max, std for standard; `None` marks a constant column
    spread: Option<f64>,
}

impl ColumnStats {
    fn compute(kind: ScalerKind, values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() || min == max {
            return Self {
                offset: if values.is_empty() { 0.0 } else { min },
                spread: None,
            };
        }

        match kind {
            ScalerKind::MinMax => Self {
                offset: min,
                spread: Some(max - min),
            },
            ScalerKind::Standard => {
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                Self {
                    offset: mean,
                    spread: Some(variance.sqrt()),
                }
            }
        }
    }

    #[inline]
    fn apply(&self, x: f32) -> f32 {
        match self.spread {
            Some(spread) => ((f64::from(x) - self.offset) / spread) as f32,
            None => 0.0,
        }
    }
}

/// Immutable per-column parameters learned from a reference population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    kind: ScalerKind,
    n_samples: usize,
    columns: Vec<ColumnStats>,
}

impl FittedScaler {
    #[inline]
    pub fn kind(&self) -> ScalerKind {
        self.kind
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    /// Number of reference rows the parameters were computed from
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn degenerate_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.spread.is_none()).count()
    }

    /// True when no column carries any signal (empty or fully constant reference)
    pub fn is_degenerate(&self) -> bool {
        self.columns.iter().all(|c| c.spread.is_none())
    }

    pub fn transform(&self, vector: &Vector) -> Result<Vector> {
        if vector.dim() != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                actual: vector.dim(),
            });
        }
        Ok(Vector::new(
            vector
                .as_slice()
                .iter()
                .zip(self.columns.iter())
                .map(|(x, stats)| stats.apply(*x))
                .collect(),
        ))
    }

    pub fn transform_all(&self, rows: &[Vector]) -> Result<Vec<Vector>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[f32]]) -> Vec<Vector> {
        data.iter().map(|r| Vector::from_slice(r)).collect()
    }

    #[test]
    fn test_min_max_maps_reference_into_unit_interval() {
        let reference = rows(&[&[60.0, 0.2], &[180.0, 0.9], &[120.0, 0.5]]);
        let scaler = ScalerKind::MinMax.fit(&reference, 2).unwrap();
        let scaled = scaler.transform_all(&reference).unwrap();

        assert_eq!(scaled[0].as_slice(), &[0.0, 0.0]);
        assert_eq!(scaled[1].as_slice(), &[1.0, 1.0]);
        for row in &scaled {
            assert!(row.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        }
        assert!((scaled[2].as_slice()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_standard_zero_mean_unit_variance() {
        let reference = rows(&[&[1.0], &[2.0], &[3.0], &[4.0]]);
        let scaler = ScalerKind::Standard.fit(&reference, 1).unwrap();
        let scaled: Vec<f32> = scaler
            .transform_all(&reference)
            .unwrap()
            .iter()
            .map(|r| r.as_slice()[0])
            .collect();

        let mean: f32 = scaled.iter().sum::<f32>() / 4.0;
        let var: f32 = scaled.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-6);
        assert!((var - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_constant_column_scales_to_zero() {
        let reference = rows(&[&[0.5, 1.0], &[0.5, 2.0], &[0.5, 3.0]]);
        for kind in [ScalerKind::MinMax, ScalerKind::Standard] {
            let scaler = kind.fit(&reference, 2).unwrap();
            assert_eq!(scaler.degenerate_columns(), 1);
            assert!(!scaler.is_degenerate());
            for row in scaler.transform_all(&reference).unwrap() {
                assert_eq!(row.as_slice()[0], 0.0);
            }
            let query = scaler.transform(&Vector::new(vec![9.0, 2.0])).unwrap();
            assert_eq!(query.as_slice()[0], 0.0);
        }
    }

    #[test]
    fn test_empty_reference_is_degenerate_not_an_error() {
        let scaler = ScalerKind::Standard.fit(&[], 3).unwrap();
        assert!(scaler.is_degenerate());
        let out = scaler.transform(&Vector::new(vec![1.0, 2.0, 3.0])).unwrap();
        assert_eq!(out.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_query_uses_reference_statistics() {
        let reference = rows(&[&[0.0], &[10.0]]);
        let scaler = ScalerKind::MinMax.fit(&reference, 1).unwrap();
        // values outside the reference range are not clipped
        let query = scaler.transform(&Vector::new(vec![20.0])).unwrap();
        assert_eq!(query.as_slice(), &[2.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let reference = rows(&[&[1.0, 2.0]]);
        assert!(matches!(
            ScalerKind::MinMax.fit(&reference, 3),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));

        let scaler = ScalerKind::MinMax.fit(&rows(&[&[1.0, 2.0], &[3.0, 4.0]]), 2).unwrap();
        assert!(matches!(
            scaler.transform(&Vector::new(vec![1.0])),
            Err(Error::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_parse_scaler_kind() {
        assert_eq!("min-max".parse::<ScalerKind>().unwrap(), ScalerKind::MinMax);
        assert_eq!("Standard".parse::<ScalerKind>().unwrap(), ScalerKind::Standard);
        assert!("robust".parse::<ScalerKind>().is_err());
    }
}
