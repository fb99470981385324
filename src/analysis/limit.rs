//! Numerical two-sided limit estimation
//!
//! Direct substitution first; when that gives no finite value the point is
//! approached from both sides with a shrinking sequence of offsets. The most
//! precise finite value on each side is kept and the two are compared with an
//! absolute tolerance. This is an approximation: oscillating functions can fool
//! it.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use super::Analysis;
use crate::config::AnalysisConfig;
use crate::error::EvalError;
use crate::expression::{Evaluation, Expression};
use crate::steps::StepTrail;
use crate::traits::{approx_eq, format_number};

/// Outcome of a limit estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitResult {
    /// The function is defined at the point: the limit is `f(x0)`
    Direct { value: f64 },
    /// Both one-sided approximations agree; `value` is their average
    TwoSidedAgreement { value: f64, left: f64, right: f64 },
    /// The sides disagree, or a side never produced a finite value
    NoLimit {
        left: Option<f64>,
        right: Option<f64>,
    },
}

impl LimitResult {
    /// The limit value, when it exists
    pub fn value(&self) -> Option<f64> {
        match self {
            LimitResult::Direct { value } | LimitResult::TwoSidedAgreement { value, .. } => {
                Some(*value)
            }
            LimitResult::NoLimit { .. } => None,
        }
    }

    pub fn exists(&self) -> bool {
        self.value().is_some()
    }
}

impl fmt::Display for LimitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitResult::Direct { value } => {
                write!(f, "limit = {} (direct substitution)", format_number(*value))
            }
            LimitResult::TwoSidedAgreement { value, .. } => {
                write!(f, "limit = {} (one-sided limits agree)", format_number(*value))
            }
            LimitResult::NoLimit { .. } => f.write_str("the limit does not exist"),
        }
    }
}

/// One pair of one-sided evaluations
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Probe {
    pub delta: f64,
    pub left: Evaluation,
    pub right: Evaluation,
}

/// Estimate together with the evidence behind it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LimitEstimate {
    pub direct: Evaluation,
    pub probes: Vec<Probe>,
    pub result: LimitResult,
}

/// Estimate the two-sided limit of `expression` at `x0`
pub(crate) fn estimate_limit(
    expression: &Expression,
    x0: f64,
    config: &AnalysisConfig,
) -> LimitEstimate {
    let direct = expression.evaluate(x0);
    if let Some(value) = direct.finite() {
        debug!(x0, value, "limit by direct substitution");
        return LimitEstimate {
            direct,
            probes: Vec::new(),
            result: LimitResult::Direct { value },
        };
    }

    let mut probes = Vec::with_capacity(config.deltas.len());
    let mut left = None;
    let mut right = None;

    // Deltas shrink, so later finite values overwrite earlier ones
    for &delta in &config.deltas {
        let probe = Probe {
            delta,
            left: expression.evaluate(x0 - delta),
            right: expression.evaluate(x0 + delta),
        };
        debug!(x0, delta, left = %probe.left, right = %probe.right, "limit probe");
        left = probe.left.finite().or(left);
        right = probe.right.finite().or(right);
        probes.push(probe);
    }

    let result = match (left, right) {
        (Some(l), Some(r)) if approx_eq(l, r, config.tolerance) => LimitResult::TwoSidedAgreement {
            value: (l + r) / 2.0,
            left: l,
            right: r,
        },
        _ => LimitResult::NoLimit { left, right },
    };

    LimitEstimate {
        direct,
        probes,
        result,
    }
}

/// Describe why direct substitution did not give a number
pub(crate) fn describe_failure(outcome: &Evaluation) -> String {
    match outcome {
        Evaluation::Undefined(EvalError::Indeterminate { form }) => {
            format!("Direct substitution gives the indeterminate form {form}.")
        }
        Evaluation::NonFinite(v) if v.is_nan() => {
            "Direct substitution gives no number (an indeterminate combination such as ∞ - ∞)."
                .to_string()
        }
        Evaluation::NonFinite(v) => {
            format!("Direct substitution diverges to {}.", format_number(*v))
        }
        Evaluation::Undefined(e) => format!("The function is not defined there: {e}."),
        Evaluation::Finite(v) => format!("Direct substitution gives {}.", format_number(*v)),
    }
}

pub(crate) fn analyze(
    expression: &Expression,
    point: f64,
    config: &AnalysisConfig,
) -> Analysis<LimitResult> {
    let var = expression.variable();
    let p = format_number(point);
    let mut trail = StepTrail::new();

    trail.push_math(
        "Compute the limit",
        format!("Find the limit of f({var}) = {expression} as {var} approaches {p}."),
        format!("\\lim_{{{var} \\to {p}}} {}", expression.to_latex()),
    );

    let estimate = estimate_limit(expression, point, config);

    trail.push(
        "Direct substitution",
        format!(
            "Substituting {var} = {p} into the function: f({p}) = {}.",
            estimate.direct
        ),
    );

    match estimate.result {
        LimitResult::Direct { value } => {
            let v = format_number(value);
            trail.push_math(
                "Result",
                format!("The function is defined at {var} = {p}, so the limit exists and equals {v}."),
                format!("\\lim_{{{var} \\to {p}}} f({var}) = f({p}) = {v}"),
            );
        }
        result => {
            trail.push(
                "Indeterminate form detected",
                format!(
                    "{} Approaching {var} = {p} from both sides instead.",
                    describe_failure(&estimate.direct)
                ),
            );
            trail.push_math(
                "One-sided limits",
                probe_table(var, point, &estimate.probes),
                one_sided_latex(var, &p, &result),
            );
            trail.push("Conclusion", conclusion(var, &p, &result, config));
        }
    }

    info!(expression = %expression, point, result = %estimate.result, "limit analysis done");

    Analysis {
        steps: trail.into_steps(),
        result: estimate.result,
    }
}

fn probe_table(var: &str, point: f64, probes: &[Probe]) -> String {
    let mut lines = Vec::with_capacity(probes.len());
    for probe in probes {
        lines.push(format!(
            "δ = {}: f({}) = {}, f({}) = {}",
            probe.delta,
            format_number_or_raw(point - probe.delta),
            probe.left,
            format_number_or_raw(point + probe.delta),
            probe.right
        ));
    }
    format!("Evaluating f({var}) near the point:\n{}", lines.join("\n"))
}

/// Probe positions need more than four decimals to be told apart
fn format_number_or_raw(x: f64) -> String {
    let rounded = (x * 1e6).round() / 1e6;
    format!("{rounded}")
}

fn side(value: Option<f64>) -> String {
    value.map_or_else(|| "\\text{no finite value}".to_string(), format_number)
}

fn one_sided_latex(var: &str, p: &str, result: &LimitResult) -> String {
    let (left, right) = match *result {
        LimitResult::TwoSidedAgreement { left, right, .. } => (Some(left), Some(right)),
        LimitResult::NoLimit { left, right } => (left, right),
        LimitResult::Direct { value } => (Some(value), Some(value)),
    };
    format!(
        "\\lim_{{{var} \\to {p}^-}} f({var}) \\approx {} \\quad \\lim_{{{var} \\to {p}^+}} f({var}) \\approx {}",
        side(left),
        side(right)
    )
}

fn conclusion(var: &str, p: &str, result: &LimitResult, config: &AnalysisConfig) -> String {
    match *result {
        LimitResult::TwoSidedAgreement { value, .. } => format!(
            "The one-sided limits agree within {}, so the limit of f({var}) as {var} approaches {p} is {}.",
            config.tolerance,
            format_number(value)
        ),
        LimitResult::NoLimit {
            left: Some(l),
            right: Some(r),
        } => format!(
            "The one-sided limits differ ({} from the left, {} from the right), so the limit does not exist.",
            format_number(l),
            format_number(r)
        ),
        LimitResult::NoLimit { left, right } => {
            let missing = match (left, right) {
                (None, None) => "either side",
                (None, Some(_)) => "the left",
                _ => "the right",
            };
            format!(
                "No finite value was found approaching from {missing}: the function diverges or is undefined there, so the limit does not exist."
            )
        }
        LimitResult::Direct { value } => format!("The limit is {}.", format_number(value)),
    }
}
