use serde::Serialize;
use thiserror::Error;

use crate::steps::SolutionStep;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors raised while turning formula text into an expression tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Formula cannot be empty")]
    EmptyFormula,

    #[error("Invalid syntax: {msg}{}", span_suffix(.span))]
    InvalidSyntax { msg: String, span: Option<Span> },

    #[error("Invalid number format: '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },

    #[error("Invalid token: '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },

    #[error("Expected '{expected}', but got '{got}'{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Unbalanced parentheses{}", span_suffix(.span))]
    UnbalancedParentheses { span: Option<Span> },

    #[error(
        "Unknown identifier '{name}'{}. Use explicit multiplication (e.g. 'a*x') or a supported function name.",
        span_suffix(.span)
    )]
    UnknownIdentifier { name: String, span: Option<Span> },

    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Expected a single free variable, found: {}", .found.join(", "))]
    MultipleVariables { found: Vec<String> },

    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,

    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,
}

impl ParseError {
    /// Create InvalidSyntax without span
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        ParseError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken without span
    pub fn invalid_token(token: impl Into<String>) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: None,
        }
    }
}

/// Reasons a formula has no real value at a point.
///
/// Never propagated out of an analysis: it is carried inside
/// [`Evaluation::Undefined`](crate::Evaluation::Undefined).
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum EvalError {
    #[error("indeterminate form {form}")]
    Indeterminate { form: &'static str },

    #[error("{function}({arg}) is outside the real domain of {function}")]
    Domain { function: &'static str, arg: f64 },

    #[error("({base})^({exponent}) has no real value")]
    ComplexPower { base: f64, exponent: f64 },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' called with {got} argument(s)")]
    Arity { name: String, got: usize },

    #[error("symbol '{0}' has no value")]
    UnboundSymbol(String),
}

/// Failures of the symbolic differentiator.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum DifferentiationError {
    #[error("no derivative rule for function '{0}'")]
    NoRule(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}

/// Invalid values in an [`AnalysisConfig`](crate::AnalysisConfig)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("delta sequence must be non-empty")]
    EmptyDeltas,

    #[error("delta sequence must be strictly decreasing")]
    DeltasNotDecreasing,

    #[error("grid bounds are inverted: [{min}, {max}]")]
    InvertedGrid { min: f64, max: f64 },

    #[error("grid of {samples} samples exceeds the limit of {limit}")]
    GridTooLarge { samples: usize, limit: usize },
}

/// Errors that abort a whole analysis request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("analysis point must be a finite number, got {0}")]
    InvalidPoint(f64),
}

impl AnalysisError {
    /// User-facing step explaining the failure and the expected syntax
    pub fn as_step(&self) -> SolutionStep {
        let hint = match self {
            AnalysisError::Parse(_) => {
                "Check the function syntax. Use x as the variable, * for products, ^ for powers \
                 and parentheses around groups, e.g. (x^2 - 4)/(x - 2) or sqrt(x + 1)."
            }
            AnalysisError::Config(_) => "Check the analysis settings.",
            AnalysisError::InvalidPoint(_) => "Enter a finite number as the analysis point.",
        };
        SolutionStep::new("Error", format!("{self}\n\n{hint}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::at(3).display(), " at position 4");
        assert_eq!(Span::new(2, 5).display(), " at positions 3-5");
        assert_eq!(Span::default().display(), "");
    }

    #[test]
    fn test_parse_error_messages_carry_span() {
        let err = ParseError::InvalidToken {
            token: "$".to_string(),
            span: Some(Span::at(0)),
        };
        assert_eq!(err.to_string(), "Invalid token: '$' at position 1");

        let err = ParseError::MultipleVariables {
            found: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Expected a single free variable, found: x, y"
        );
    }

    #[test]
    fn test_error_step_mentions_syntax() {
        let err = AnalysisError::from(ParseError::EmptyFormula);
        let step = err.as_step();
        assert_eq!(step.label, "Error");
        assert!(step.content.starts_with("Formula cannot be empty"));
        assert!(step.content.contains("syntax"));
    }
}
