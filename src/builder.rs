//! Builder API for running analyses
//!
//! [`Analyzer`] carries one [`AnalysisConfig`] and exposes a setter per field,
//! so precision is tuned in one place for every analysis it runs.
//!
//! # Example
//! ```
//! use stepcalc::{Analyzer, LimitResult};
//!
//! let analysis = Analyzer::new()
//!     .tolerance(1e-4)
//!     .limit("(x^2 - 4)/(x - 2)", 2.0)
//!     .unwrap();
//! assert!(matches!(analysis.result, LimitResult::TwoSidedAgreement { .. }));
//! ```

use tracing::debug;

use crate::analysis::{
    self, Analysis, AnalysisReport, ContinuityResult, DerivativeResult, LimitResult, Mode,
    SignTable,
};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::expression::Expression;

/// Fluent front door to the four analyses
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer with the documented default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(config: AnalysisConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Values with `|v| < epsilon` count as zero
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Agreement threshold for one-sided limits and for limit vs value
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Neighbourhood offsets for limit probing, largest first
    pub fn deltas(mut self, deltas: impl Into<Vec<f64>>) -> Self {
        self.config.deltas = deltas.into();
        self
    }

    /// Sign-analysis grid bounds and spacing
    pub fn grid(mut self, min: f64, max: f64, step: f64) -> Self {
        self.config.grid_min = min;
        self.config.grid_max = max;
        self.config.grid_step = step;
        self
    }

    /// Test values for quotients that cannot be split
    pub fn fallback_points(mut self, points: impl Into<Vec<f64>>) -> Self {
        self.config.fallback_points = points.into();
        self
    }

    pub fn plot_clamp(mut self, clamp: f64) -> Self {
        self.config.plot_clamp = clamp;
        self
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set maximum AST node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.config.max_nodes = nodes;
        self
    }

    /// Parse formula text under this analyzer's size limits
    ///
    /// # Errors
    /// `AnalysisError::Config` for an invalid configuration,
    /// `AnalysisError::Parse` for malformed text.
    pub fn parse(&self, text: &str) -> Result<Expression, AnalysisError> {
        self.config.validate()?;
        Ok(Expression::parse_with_limits(
            text,
            self.config.parse_limits(),
        )?)
    }

    fn prepare(&self, text: &str, point: f64) -> Result<Expression, AnalysisError> {
        if !point.is_finite() {
            return Err(AnalysisError::InvalidPoint(point));
        }
        let expression = self.parse(text)?;
        debug!(expression = %expression, point, "request accepted");
        Ok(expression)
    }

    /// Limit of `text` as the variable approaches `point`
    ///
    /// # Errors
    /// Parse and configuration errors, or a non-finite `point`.
    pub fn limit(&self, text: &str, point: f64) -> Result<Analysis<LimitResult>, AnalysisError> {
        let f = self.prepare(text, point)?;
        Ok(analysis::limit::analyze(&f, point, &self.config))
    }

    /// Symbolic derivative and its value at `point`
    ///
    /// A missing derivative rule is not an error: it is reported in the result.
    ///
    /// # Errors
    /// Parse and configuration errors, or a non-finite `point`.
    pub fn derivative(
        &self,
        text: &str,
        point: f64,
    ) -> Result<Analysis<DerivativeResult>, AnalysisError> {
        let f = self.prepare(text, point)?;
        Ok(analysis::derivative::analyze(&f, point, &self.config))
    }

    /// Continuity classification at `point`
    ///
    /// # Errors
    /// Parse and configuration errors, or a non-finite `point`.
    pub fn continuity(
        &self,
        text: &str,
        point: f64,
    ) -> Result<Analysis<ContinuityResult>, AnalysisError> {
        let f = self.prepare(text, point)?;
        Ok(analysis::continuity::analyze(&f, point, &self.config))
    }

    /// Sign table over the configured grid
    ///
    /// # Errors
    /// Parse and configuration errors.
    pub fn sign(&self, text: &str) -> Result<Analysis<SignTable>, AnalysisError> {
        let f = self.parse(text)?;
        Ok(analysis::sign::analyze(&f, &self.config))
    }

    /// Run the analysis named by `mode`
    ///
    /// The point is ignored (and not validated) for [`Mode::Sign`].
    ///
    /// # Errors
    /// Parse and configuration errors, or a non-finite `point`.
    pub fn run(&self, mode: Mode, text: &str, point: f64) -> Result<AnalysisReport, AnalysisError> {
        let f = if mode.uses_point() {
            self.prepare(text, point)?
        } else {
            self.parse(text)?
        };
        Ok(analysis::run(mode, &f, point, &self.config))
    }

    /// Run on an already parsed expression
    ///
    /// # Errors
    /// Configuration errors, or a non-finite `point` for point-based modes.
    pub fn run_expression(
        &self,
        mode: Mode,
        expression: &Expression,
        point: f64,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.config.validate()?;
        if mode.uses_point() && !point.is_finite() {
            return Err(AnalysisError::InvalidPoint(point));
        }
        Ok(analysis::run(mode, expression, point, &self.config))
    }
}
