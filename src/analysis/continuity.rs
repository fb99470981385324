//! Continuity at a point by the three-condition test
//!
//! f is continuous at p when f(p) exists, the limit at p exists, and the two
//! agree. Failures are labeled removable (limit exists) or jump (it does not).

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::limit::{describe_failure, estimate_limit};
use super::{Analysis, LimitResult};
use crate::config::AnalysisConfig;
use crate::expression::Expression;
use crate::steps::StepTrail;
use crate::traits::{approx_eq, format_number};

/// Continuity verdict at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContinuityResult {
    Continuous {
        value: f64,
    },
    /// The limit exists but f(p) is missing or different
    RemovableDiscontinuity {
        limit: f64,
        value: Option<f64>,
    },
    /// One-sided limits disagree or do not exist
    JumpDiscontinuity {
        left: Option<f64>,
        right: Option<f64>,
    },
}

impl ContinuityResult {
    pub fn is_continuous(&self) -> bool {
        matches!(self, ContinuityResult::Continuous { .. })
    }
}

impl fmt::Display for ContinuityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContinuityResult::Continuous { .. } => f.write_str("continuous"),
            ContinuityResult::RemovableDiscontinuity { limit, .. } => write!(
                f,
                "removable discontinuity (limit {})",
                format_number(*limit)
            ),
            ContinuityResult::JumpDiscontinuity { .. } => {
                f.write_str("non-removable (jump) discontinuity")
            }
        }
    }
}

/// Classify continuity without narrating
pub(crate) fn classify(
    expression: &Expression,
    point: f64,
    config: &AnalysisConfig,
) -> ContinuityResult {
    let value = expression.evaluate(point).finite();
    let limit = estimate_limit(expression, point, config).result;
    verdict(value, &limit, config)
}

fn verdict(value: Option<f64>, limit: &LimitResult, config: &AnalysisConfig) -> ContinuityResult {
    match (*limit, value) {
        (LimitResult::NoLimit { left, right }, _) => {
            ContinuityResult::JumpDiscontinuity { left, right }
        }
        (LimitResult::Direct { value: l } | LimitResult::TwoSidedAgreement { value: l, .. }, None) => {
            ContinuityResult::RemovableDiscontinuity {
                limit: l,
                value: None,
            }
        }
        (LimitResult::Direct { value: l } | LimitResult::TwoSidedAgreement { value: l, .. }, Some(v)) => {
            if !approx_eq(v, l, config.tolerance) {
                ContinuityResult::RemovableDiscontinuity {
                    limit: l,
                    value: Some(v),
                }
            } else {
                ContinuityResult::Continuous { value: v }
            }
        }
    }
}

pub(crate) fn analyze(
    expression: &Expression,
    point: f64,
    config: &AnalysisConfig,
) -> Analysis<ContinuityResult> {
    let var = expression.variable();
    let p = format_number(point);
    let mut trail = StepTrail::new();

    trail.push_math(
        "Check continuity",
        format!("Analyzing f({var}) = {expression} at {var} = {p}."),
        format!("f({var}) = {}", expression.to_latex()),
    );

    // Condition 1: f(p) exists
    let outcome = expression.evaluate(point);
    let value = outcome.finite();
    match value {
        Some(v) => trail.push_math(
            &format!("Evaluate f({p})"),
            format!("f({p}) = {}. ✓ The function is defined at the point.", format_number(v)),
            format!("f({p}) = {}", format_number(v)),
        ),
        None => trail.push_math(
            &format!("Evaluate f({p})"),
            format!(
                "f({p}) is not defined ({}). ✗ The function is not defined at the point.",
                outcome
            ),
            format!("f({p}) = \\text{{undefined}}"),
        ),
    }

    // Condition 2: the limit exists
    let estimate = estimate_limit(expression, point, config);
    let limit_text = match estimate.result {
        LimitResult::Direct { value } => format!(
            "Direct substitution works, so the limit is {}.",
            format_number(value)
        ),
        LimitResult::TwoSidedAgreement { value, left, right } => format!(
            "{} The one-sided limits are {} (left) and {} (right); they agree, so the limit is {}.",
            describe_failure(&estimate.direct),
            format_number(left),
            format_number(right),
            format_number(value)
        ),
        LimitResult::NoLimit { left, right } => format!(
            "{} The one-sided limits are {} (left) and {} (right); the limit does not exist.",
            describe_failure(&estimate.direct),
            left.map_or_else(|| "undefined".to_string(), format_number),
            right.map_or_else(|| "undefined".to_string(), format_number)
        ),
    };
    trail.push("Compute the limit", limit_text);

    // Condition 3 and verdict
    let result = verdict(value, &estimate.result, config);
    trail.push("Conclusion", conclusion(var, &p, value, &result));

    info!(expression = %expression, point, %result, "continuity analysis done");

    Analysis {
        steps: trail.into_steps(),
        result,
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn conclusion(var: &str, p: &str, value: Option<f64>, result: &ContinuityResult) -> String {
    let limit_exists = !matches!(result, ContinuityResult::JumpDiscontinuity { .. });
    let conditions = format!(
        "{} f({p}) exists\n{} the limit as {var} → {p} exists\n{} f({p}) equals the limit",
        mark(value.is_some()),
        mark(limit_exists),
        mark(result.is_continuous()),
    );
    let verdict = match result {
        ContinuityResult::Continuous { .. } => format!("The function is continuous at {var} = {p}."),
        ContinuityResult::RemovableDiscontinuity { limit, value: None } => format!(
            "The function is not continuous at {var} = {p}: removable discontinuity. Defining f({p}) = {} would make it continuous.",
            format_number(*limit)
        ),
        ContinuityResult::RemovableDiscontinuity { limit, value: Some(v) } => format!(
            "The function is not continuous at {var} = {p}: removable discontinuity, f({p}) = {} differs from the limit {}.",
            format_number(*v),
            format_number(*limit)
        ),
        ContinuityResult::JumpDiscontinuity { .. } => format!(
            "The function is not continuous at {var} = {p}: the one-sided limits disagree or do not exist (non-removable discontinuity)."
        ),
    };
    format!("{conditions}\n\n{verdict}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_str(input: &str, x0: f64) -> ContinuityResult {
        let f = Expression::parse(input).unwrap();
        classify(&f, x0, &AnalysisConfig::default())
    }

    #[test]
    fn test_continuous_polynomial() {
        assert_eq!(
            classify_str("x^2 - 1", 2.0),
            ContinuityResult::Continuous { value: 3.0 }
        );
    }

    #[test]
    fn test_hole_is_removable() {
        match classify_str("(x^2 - 4)/(x - 2)", 2.0) {
            ContinuityResult::RemovableDiscontinuity { limit, value: None } => {
                assert!((limit - 4.0).abs() < 1e-3);
            }
            other => panic!("expected removable, got {other:?}"),
        }
    }

    #[test]
    fn test_pole_is_jump() {
        assert!(matches!(
            classify_str("1/x", 0.0),
            ContinuityResult::JumpDiscontinuity { .. }
        ));
    }

    #[test]
    fn test_even_pole_reads_as_removable() {
        // Both sides of 1/x^2 blow up to the same value at the smallest delta
        match classify_str("1/x^2", 0.0) {
            ContinuityResult::RemovableDiscontinuity { limit, value: None } => {
                assert!((limit - 1e10).abs() < 1.0);
            }
            other => panic!("expected removable, got {other:?}"),
        }
    }

    #[test]
    fn test_verdict_compares_value_and_limit() {
        let config = AnalysisConfig::default();
        let limit = LimitResult::TwoSidedAgreement {
            value: 1.0,
            left: 1.0,
            right: 1.0,
        };
        assert_eq!(
            verdict(Some(2.0), &limit, &config),
            ContinuityResult::RemovableDiscontinuity {
                limit: 1.0,
                value: Some(2.0)
            }
        );
        assert_eq!(
            verdict(Some(1.0005), &limit, &config),
            ContinuityResult::Continuous { value: 1.0005 }
        );
    }

    #[test]
    fn test_conclusion_lists_conditions() {
        let f = Expression::parse("(x^2 - 4)/(x - 2)").unwrap();
        let analysis = analyze(&f, 2.0, &AnalysisConfig::default());
        assert_eq!(analysis.steps.len(), 4);
        let last = &analysis.steps[3].content;
        assert!(last.contains("✗ f(2) exists"));
        assert!(last.contains("✓ the limit"));
        assert!(last.contains("removable discontinuity"));
    }
}
