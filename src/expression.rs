//! Parsed single-variable expressions and their point evaluations

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::error::{EvalError, ParseError};
use crate::parser::{parse_with_limits, ParseLimits};
use crate::traits::format_number;
use crate::Expr;

/// Variable name used when a formula has no free variable
pub const DEFAULT_VARIABLE: &str = "x";

/// Outcome of evaluating an expression at a point
///
/// Keeps "diverges" (`NonFinite`) apart from "has no real value" (`Undefined`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Evaluation {
    /// A usable real number
    Finite(f64),
    /// ±∞ or NaN
    NonFinite(f64),
    /// No real value: indeterminate form or domain violation
    Undefined(EvalError),
}

impl Evaluation {
    /// Classify a raw evaluation result
    pub fn from_result(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(v) if v.is_finite() => Evaluation::Finite(v),
            Ok(v) => Evaluation::NonFinite(v),
            Err(e) => Evaluation::Undefined(e),
        }
    }

    /// The value, when finite
    pub fn finite(&self) -> Option<f64> {
        match self {
            Evaluation::Finite(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Evaluation::Finite(_))
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Finite(v) | Evaluation::NonFinite(v) => f.write_str(&format_number(*v)),
            Evaluation::Undefined(e) => write!(f, "undefined ({e})"),
        }
    }
}

/// An immutable parsed formula over at most one free variable
///
/// Evaluation is referentially transparent: the same point always gives the
/// same [`Evaluation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
    variable: Option<String>,
}

impl Expression {
    /// Parse formula text with the default size limits
    ///
    /// # Errors
    /// `ParseError` on malformed input or more than one free variable.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with_limits(text, ParseLimits::default())
    }

    /// Parse formula text with explicit size limits
    ///
    /// # Errors
    /// `ParseError` on malformed input, oversize trees or more than one free variable.
    pub fn parse_with_limits(text: &str, limits: ParseLimits) -> Result<Self, ParseError> {
        let expr = parse_with_limits(text, limits)?;
        Ok(Self::from_parts(text.trim().to_string(), expr))
    }

    /// Wrap an already-built tree, e.g. a derivative
    pub fn from_expr(expr: Expr) -> Self {
        let source = expr.to_string();
        Self::from_parts(source, expr)
    }

    fn from_parts(source: String, expr: Expr) -> Self {
        let variable = expr.free_variables().into_iter().next();
        Expression {
            source,
            expr,
            variable,
        }
    }

    /// The text the expression was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The free variable, or `x` for constant formulas
    pub fn variable(&self) -> &str {
        self.variable.as_deref().unwrap_or(DEFAULT_VARIABLE)
    }

    pub fn is_constant(&self) -> bool {
        self.variable.is_none()
    }

    /// Evaluate at `x`
    pub fn evaluate(&self, x: f64) -> Evaluation {
        let outcome =
            Evaluation::from_result(crate::evaluator::eval_at(&self.expr, self.variable(), x));
        trace!(expression = %self.source, x, ?outcome, "evaluated");
        outcome
    }

    /// LaTeX rendering of the tree
    pub fn to_latex(&self) -> String {
        self.expr.to_latex()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        let f = Expression::parse("(x^2 - 4)/(x - 2)").unwrap();
        assert_eq!(f.evaluate(3.0), Evaluation::Finite(5.0));
        assert!(matches!(
            f.evaluate(2.0),
            Evaluation::Undefined(EvalError::Indeterminate { .. })
        ));

        let g = Expression::parse("1/x").unwrap();
        assert_eq!(g.evaluate(0.0), Evaluation::NonFinite(f64::INFINITY));
        assert_eq!(g.evaluate(0.0).finite(), None);
    }

    #[test]
    fn test_variable_detection() {
        assert_eq!(Expression::parse("t^2").unwrap().variable(), "t");
        let c = Expression::parse("2*pi").unwrap();
        assert!(c.is_constant());
        assert_eq!(c.variable(), "x");
        assert_eq!(c.evaluate(123.0).finite(), Some(2.0 * std::f64::consts::PI));
    }

    #[test]
    fn test_source_is_trimmed() {
        let f = Expression::parse("  x + 1 ").unwrap();
        assert_eq!(f.source(), "x + 1");
    }

    #[test]
    fn test_display_of_outcomes() {
        assert_eq!(Evaluation::Finite(4.0).to_string(), "4");
        assert_eq!(Evaluation::NonFinite(f64::NEG_INFINITY).to_string(), "-∞");
        assert_eq!(
            Evaluation::Undefined(EvalError::Indeterminate { form: "0/0" }).to_string(),
            "undefined (indeterminate form 0/0)"
        );
    }
}
