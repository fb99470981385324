//! Parser module - converts strings to AST
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::error::ParseError;
use crate::Expr;

/// Size limits applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum nesting depth of the tree
    pub max_depth: usize,
    /// Maximum total number of nodes
    pub max_nodes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        ParseLimits {
            max_depth: 100,
            max_nodes: 10_000,
        }
    }
}

/// Parse a formula string into an expression AST
///
/// The formula may use at most one free variable: any single letter except
/// the constant `e`. Products can be written implicitly: `2x`, `3(x + 1)`,
/// `(x - 1)(x + 1)`.
///
/// # Example
/// ```
/// use stepcalc::parse;
///
/// let expr = parse("(x^2 - 4)/(x - 2)").unwrap();
/// assert_eq!(expr.to_string(), "(x^2 - 4)/(x - 2)");
/// ```
///
/// # Errors
/// Returns `ParseError` if:
/// - The input is empty
/// - The input contains invalid syntax or unknown names
/// - Parentheses are unbalanced
/// - More than one free variable appears
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with_limits(input, ParseLimits::default())
}

/// Parse with explicit size limits
///
/// # Errors
/// Same as [`parse`], plus `MaxDepthExceeded` / `MaxNodesExceeded`.
pub fn parse_with_limits(input: &str, limits: ParseLimits) -> Result<Expr, ParseError> {
    // Pipeline: validate -> balance check -> lex -> implicit_mul -> parse -> limits -> variables

    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    lexer::check_parentheses(input)?;

    let tokens = lexer::lex(input)?;
    let tokens = implicit_mul::insert_implicit_multiplication(tokens);
    let expr = pratt::parse_expression(&tokens, limits.max_depth)?;

    if expr.max_depth() > limits.max_depth {
        return Err(ParseError::MaxDepthExceeded);
    }
    if expr.node_count() > limits.max_nodes {
        return Err(ParseError::MaxNodesExceeded);
    }

    let vars = expr.free_variables();
    if vars.len() > 1 {
        return Err(ParseError::MultipleVariables {
            found: vars.into_iter().collect(),
        });
    }

    Ok(expr)
}
