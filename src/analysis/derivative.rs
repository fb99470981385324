//! Symbolic derivative with a value at the point and a numerical cross-check

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use super::Analysis;
use crate::config::AnalysisConfig;
use crate::differentiation::differentiate;
use crate::error::DifferentiationError;
use crate::expression::{Evaluation, Expression};
use crate::steps::StepTrail;
use crate::traits::{approx_eq, format_number};

/// Step size of the central difference quotient
pub const CENTRAL_DIFFERENCE_STEP: f64 = 1e-5;

/// Outcome of the derivative analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivativeResult {
    Computed {
        /// Plain-text derivative, re-parseable
        derivative: String,
        latex: String,
        /// f'(p)
        value: Evaluation,
        /// `(f(p+h) - f(p-h)) / 2h`, when both samples are finite
        numeric_estimate: Option<f64>,
    },
    /// No rule applies; the rest of the analysis is skipped
    Unsupported { reason: DifferentiationError },
}

impl fmt::Display for DerivativeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivativeResult::Computed {
                derivative, value, ..
            } => write!(f, "f' = {derivative}, f'(p) = {value}"),
            DerivativeResult::Unsupported { reason } => {
                write!(f, "derivative could not be computed: {reason}")
            }
        }
    }
}

/// Central difference quotient of `expression` at `x`
///
/// `None` when either neighbouring sample is not finite.
pub fn central_difference(expression: &Expression, x: f64, h: f64) -> Option<f64> {
    let ahead = expression.evaluate(x + h).finite()?;
    let behind = expression.evaluate(x - h).finite()?;
    let slope = (ahead - behind) / (2.0 * h);
    slope.is_finite().then_some(slope)
}

pub(crate) fn analyze(
    expression: &Expression,
    point: f64,
    _config: &AnalysisConfig,
) -> Analysis<DerivativeResult> {
    let var = expression.variable();
    let p = format_number(point);
    let mut trail = StepTrail::new();

    trail.push_math(
        "Function to differentiate",
        format!("f({var}) = {expression}"),
        format!("f({var}) = {}", expression.to_latex()),
    );
    trail.push_math(
        "Apply the definition",
        "The derivative is the limit of the difference quotient as h → 0.",
        format!("f'({var}) = \\lim_{{h \\to 0}} \\frac{{f({var} + h) - f({var})}}{{h}}"),
    );

    let derivative = match differentiate(expression) {
        Ok(d) => d,
        Err(reason) => {
            warn!(expression = %expression, %reason, "no derivative rule");
            trail.push(
                "Derivative not available",
                format!("The derivative could not be computed: {reason}."),
            );
            return Analysis {
                steps: trail.into_steps(),
                result: DerivativeResult::Unsupported { reason },
            };
        }
    };

    let latex = derivative.to_latex();
    trail.push_math(
        "Compute the derivative",
        format!("Applying the differentiation rules: f'({var}) = {derivative}"),
        format!("f'({var}) = {latex}"),
    );

    let value = derivative.evaluate(point);
    match value.finite() {
        Some(v) => trail.push_math(
            &format!("Evaluate at {var} = {p}"),
            format!("f'({p}) = {}", format_number(v)),
            format!("f'({p}) = {}", format_number(v)),
        ),
        None => trail.push(
            &format!("Evaluate at {var} = {p}"),
            format!("f'({p}) is {value}: the derivative has no finite value at this point."),
        ),
    }

    let numeric_estimate = central_difference(expression, point, CENTRAL_DIFFERENCE_STEP);
    let check = match (numeric_estimate, value.finite()) {
        (Some(estimate), Some(exact)) => format!(
            "The central difference (f({p} + h) - f({p} - h)) / 2h with h = {} gives {}, {} the symbolic value {}.",
            CENTRAL_DIFFERENCE_STEP,
            format_number(estimate),
            if approx_eq(estimate, exact, 1e-3 * exact.abs().max(1.0)) {
                "matching"
            } else {
                "not matching"
            },
            format_number(exact)
        ),
        (Some(estimate), None) => format!(
            "The central difference with h = {} gives {}.",
            CENTRAL_DIFFERENCE_STEP,
            format_number(estimate)
        ),
        (None, _) => format!(
            "The function has no finite value next to {var} = {p}, so no numerical check is possible."
        ),
    };
    trail.push("Numerical check", check);

    info!(expression = %expression, point, derivative = %derivative, "derivative analysis done");

    Analysis {
        steps: trail.into_steps(),
        result: DerivativeResult::Computed {
            derivative: derivative.to_string(),
            latex,
            value,
            numeric_estimate,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, point: f64) -> Analysis<DerivativeResult> {
        let f = Expression::parse(input).unwrap();
        analyze(&f, point, &AnalysisConfig::default())
    }

    #[test]
    fn test_square_at_three() {
        let analysis = run("x^2", 3.0);
        match &analysis.result {
            DerivativeResult::Computed {
                derivative,
                latex,
                value,
                numeric_estimate,
            } => {
                assert_eq!(derivative, "2*x");
                assert_eq!(latex, "2x");
                assert_eq!(*value, Evaluation::Finite(6.0));
                assert!((numeric_estimate.unwrap() - 6.0).abs() < 1e-6);
            }
            other => panic!("expected a derivative, got {other:?}"),
        }
        assert_eq!(analysis.steps.len(), 5);
        let check = &analysis.steps[4].content;
        assert!(check.contains(", matching the symbolic value 6"), "{check}");
        assert!(!check.contains("not matching"), "{check}");
    }

    #[test]
    fn test_numerical_check_flags_disagreement() {
        // cbrt is far from linear over [x - h, x + h] this close to 0
        let analysis = run("cbrt(x)", 1e-12);
        match &analysis.result {
            DerivativeResult::Computed {
                value,
                numeric_estimate,
                ..
            } => {
                let exact = value.finite().unwrap();
                assert!((exact - 1e8 / 3.0).abs() < 1.0);
                assert!((numeric_estimate.unwrap() - 2154.4).abs() < 1.0);
            }
            other => panic!("expected a derivative, got {other:?}"),
        }
        assert!(analysis.steps[4].content.contains("not matching the symbolic value"));
    }

    #[test]
    fn test_unsupported_rule_is_reported() {
        let analysis = run("round(x)", 1.0);
        assert_eq!(
            analysis.result,
            DerivativeResult::Unsupported {
                reason: DifferentiationError::NoRule("round".into())
            }
        );
        assert_eq!(analysis.steps.len(), 3);
        assert_eq!(analysis.steps[2].label, "Step 3: Derivative not available");
    }

    #[test]
    fn test_derivative_undefined_at_point() {
        let analysis = run("sqrt(x)", 0.0);
        match analysis.result {
            DerivativeResult::Computed { value, .. } => assert!(!value.is_finite()),
            other => panic!("expected a derivative, got {other:?}"),
        }
    }

    #[test]
    fn test_central_difference() {
        let f = Expression::parse("sin(x)").unwrap();
        let slope = central_difference(&f, 0.0, 1e-5).unwrap();
        assert!((slope - 1.0).abs() < 1e-8);
        let g = Expression::parse("sqrt(x)").unwrap();
        assert_eq!(central_difference(&g, 0.0, 1e-5), None);
    }
}
