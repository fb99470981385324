//! Numeric settings shared by every analysis
//!
//! The limit estimator, continuity classifier, sign analyzer and plot sampler
//! all read their constants from one [`AnalysisConfig`].

use serde::Serialize;

use crate::error::ConfigError;
use crate::parser::ParseLimits;

/// Largest grid the sign analyzer will scan
pub const MAX_GRID_SAMPLES: usize = 100_000;

/// All tunable constants of the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// A value with `|v| < epsilon` counts as zero
    pub epsilon: f64,
    /// Two numbers closer than this agree (one-sided limits, limit vs value)
    pub tolerance: f64,
    /// Neighbourhood offsets for limit probing, strictly decreasing
    pub deltas: Vec<f64>,
    /// Lower bound of the sign-analysis grid
    pub grid_min: f64,
    /// Upper bound of the sign-analysis grid
    pub grid_max: f64,
    /// Spacing of the sign-analysis grid
    pub grid_step: f64,
    /// Test values used when a quotient cannot be split cleanly
    pub fallback_points: Vec<f64>,
    /// Plot samples with `|y|` at or above this are not drawn
    pub plot_clamp: f64,
    /// Parser tree depth limit
    pub max_depth: usize,
    /// Parser node count limit
    pub max_nodes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            epsilon: 0.001,
            tolerance: 0.001,
            deltas: vec![0.1, 0.01, 0.001, 0.0001, 0.00001],
            grid_min: -20.0,
            grid_max: 20.0,
            grid_step: 0.5,
            fallback_points: vec![-10.0, -5.0, -2.0, -1.0, 0.0, 1.0, 2.0, 5.0, 10.0],
            plot_clamp: 100.0,
            max_depth: 100,
            max_nodes: 10_000,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

impl AnalysisConfig {
    /// Check every field, returning the first problem found
    ///
    /// # Errors
    /// `ConfigError` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("epsilon", self.epsilon)?;
        positive("tolerance", self.tolerance)?;
        positive("grid_step", self.grid_step)?;
        positive("plot_clamp", self.plot_clamp)?;

        if self.deltas.is_empty() {
            return Err(ConfigError::EmptyDeltas);
        }
        for &d in &self.deltas {
            positive("delta", d)?;
        }
        if self.deltas.windows(2).any(|w| w[1] >= w[0]) {
            return Err(ConfigError::DeltasNotDecreasing);
        }

        if !self.grid_min.is_finite() || !self.grid_max.is_finite() || self.grid_min >= self.grid_max {
            return Err(ConfigError::InvertedGrid {
                min: self.grid_min,
                max: self.grid_max,
            });
        }
        let samples = self.grid_len();
        if samples > MAX_GRID_SAMPLES {
            return Err(ConfigError::GridTooLarge {
                samples,
                limit: MAX_GRID_SAMPLES,
            });
        }

        if self.max_depth == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_depth",
                value: 0.0,
            });
        }
        if self.max_nodes == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_nodes",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Number of sample points on the sign-analysis grid
    pub fn grid_len(&self) -> usize {
        let span = (self.grid_max - self.grid_min) / self.grid_step;
        if span.is_finite() && span >= 0.0 {
            // Tolerate round-off so [-20, 20] step 0.5 gives 81 points
            (span + 1e-9).floor() as usize + 1
        } else {
            usize::MAX
        }
    }

    /// The i-th grid sample, computed from the index to avoid drift
    pub fn grid_point(&self, i: usize) -> f64 {
        self.grid_min + i as f64 * self.grid_step
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.epsilon, 0.001);
        assert_eq!(cfg.tolerance, 0.001);
        assert_eq!(cfg.deltas, vec![0.1, 0.01, 0.001, 0.0001, 0.00001]);
        assert_eq!((cfg.grid_min, cfg.grid_max, cfg.grid_step), (-20.0, 20.0, 0.5));
        assert_eq!(cfg.plot_clamp, 100.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_grid_points() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.grid_len(), 81);
        assert_eq!(cfg.grid_point(0), -20.0);
        assert_eq!(cfg.grid_point(40), 0.0);
        assert_eq!(cfg.grid_point(80), 20.0);
    }

    #[test]
    fn test_validation_failures() {
        let cfg = AnalysisConfig {
            epsilon: 0.0,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                name: "epsilon",
                value: 0.0
            })
        );

        let cfg = AnalysisConfig {
            deltas: vec![0.1, 0.1],
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::DeltasNotDecreasing));

        let cfg = AnalysisConfig {
            deltas: vec![],
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyDeltas));

        let cfg = AnalysisConfig {
            grid_min: 5.0,
            grid_max: -5.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedGrid { .. })));

        let cfg = AnalysisConfig {
            grid_step: 1e-6,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::GridTooLarge { .. })));
    }
}
