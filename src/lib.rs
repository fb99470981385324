//! Step-by-step analysis of single-variable real functions
//!
//! Four analyses, each returning an ordered explanation trail together with a
//! typed result:
//! - **Limit**: direct substitution, then two-sided numerical probing
//! - **Derivative**: symbolic differentiation, value at a point, numerical check
//! - **Continuity**: the three-condition test, removable vs jump discontinuities
//! - **Sign**: sign table from a grid scan, splitting `(N)/(D)` quotients
//!
//! # Usage Examples
//!
//! ## Free functions with the default constants
//! ```
//! use stepcalc::{compute_limit, LimitResult};
//!
//! let analysis = compute_limit("(x^2 - 4)/(x - 2)", 2.0).unwrap();
//! for step in &analysis.steps {
//!     println!("{}\n{}", step.label, step.content);
//! }
//! let value = analysis.result.value().unwrap();
//! assert!((value - 4.0).abs() < 1e-3);
//! ```
//!
//! ## Builder with custom precision
//! ```
//! use stepcalc::{Analyzer, Mode};
//!
//! let report = Analyzer::new()
//!     .grid(-5.0, 5.0, 0.25)
//!     .run(Mode::Sign, "(x-1)*(x+1)", 0.0)
//!     .unwrap();
//! println!("{}", report.summary());
//! ```

mod ast;
mod builder;
mod config;
mod differentiation;
mod display;
mod error;
mod evaluator;
mod expression;
mod functions;
mod parser;
mod simplification;
mod steps;
pub mod traits;

pub mod analysis;
pub mod plot;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use analysis::derivative::{central_difference, CENTRAL_DIFFERENCE_STEP};
pub use analysis::{
    Analysis, AnalysisReport, ContinuityResult, DerivativeResult, LimitResult, Mode, Region, Sign,
    SignEntry, SignMethod, SignTable,
};
pub use ast::{Expr, ExprKind};
pub use builder::Analyzer;
pub use config::{AnalysisConfig, MAX_GRID_SAMPLES};
pub use differentiation::differentiate;
pub use error::{AnalysisError, ConfigError, DifferentiationError, EvalError, ParseError, Span};
pub use expression::{Evaluation, Expression, DEFAULT_VARIABLE};
pub use parser::{parse, parse_with_limits, ParseLimits};
pub use simplification::simplify;
pub use steps::SolutionStep;

/// Limit of `text` as its variable approaches `point`
///
/// # Errors
/// `AnalysisError` if the text does not parse or `point` is not finite.
pub fn compute_limit(text: &str, point: f64) -> Result<Analysis<LimitResult>, AnalysisError> {
    Analyzer::new().limit(text, point)
}

/// Symbolic derivative of `text` and its value at `point`
///
/// # Example
/// ```
/// use stepcalc::{compute_derivative, DerivativeResult, Evaluation};
///
/// let analysis = compute_derivative("x^2", 3.0).unwrap();
/// match analysis.result {
///     DerivativeResult::Computed { derivative, value, .. } => {
///         assert_eq!(derivative, "2*x");
///         assert_eq!(value, Evaluation::Finite(6.0));
///     }
///     DerivativeResult::Unsupported { reason } => panic!("{reason}"),
/// }
/// ```
///
/// # Errors
/// `AnalysisError` if the text does not parse or `point` is not finite.
pub fn compute_derivative(
    text: &str,
    point: f64,
) -> Result<Analysis<DerivativeResult>, AnalysisError> {
    Analyzer::new().derivative(text, point)
}

/// Continuity of `text` at `point`
///
/// # Errors
/// `AnalysisError` if the text does not parse or `point` is not finite.
pub fn compute_continuity(
    text: &str,
    point: f64,
) -> Result<Analysis<ContinuityResult>, AnalysisError> {
    Analyzer::new().continuity(text, point)
}

/// Sign table of `text`
///
/// # Errors
/// `AnalysisError` if the text does not parse.
pub fn compute_sign(text: &str) -> Result<Analysis<SignTable>, AnalysisError> {
    Analyzer::new().sign(text)
}
