use crate::error::{ParseError, Span};
use crate::functions::registry::Registry;
use crate::parser::tokens::{Operator, Spanned, Token, UNARY_PRECEDENCE};
use crate::Expr;

/// Parse tokens into an AST using Pratt parsing algorithm
///
/// `max_depth` bounds the recursion so deeply nested input fails cleanly
/// instead of exhausting the stack.
pub(crate) fn parse_expression(tokens: &[Spanned], max_depth: usize) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let expr = parser.parse_expr(0)?;

    // Everything must be consumed: `x 2 )` style leftovers are errors
    match parser.current() {
        None => Ok(expr),
        Some(extra) => Err(ParseError::UnexpectedToken {
            expected: "end of input".to_string(),
            got: extra.token.to_user_string(),
            span: Some(extra.span),
        }),
    }
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(tok) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                got: tok.token.to_user_string(),
                span: Some(tok.span),
            },
            None => ParseError::UnexpectedEndOfInput,
        }
    }

    fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        match self.current() {
            Some(Spanned {
                token: Token::RightParen,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(")")),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(Spanned {
            token: Token::Operator(op),
            ..
        }) = self.current()
        {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            left = self.parse_infix(left, *op)?;
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        loop {
            args.push(self.parse_expr(0)?);

            match self.current().map(|t| &t.token) {
                Some(Token::Comma) => self.advance(),
                Some(Token::RightParen) => break,
                _ => return Err(self.unexpected(", or )")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.current() else {
            return Err(ParseError::UnexpectedEndOfInput);
        };

        match &spanned.token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name.clone()))
            }

            Token::Function(name) => {
                self.advance();
                self.parse_call(*name, spanned.span)
            }

            // Unary minus sits between Mul (20) and Pow (30): -x^2 is -(x^2)
            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(Expr::neg(expr))
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance();
                if matches!(self.current().map(|t| &t.token), Some(Token::RightParen)) {
                    return Err(ParseError::invalid_syntax_at(
                        "empty parentheses",
                        spanned.span,
                    ));
                }
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            other => Err(ParseError::InvalidToken {
                token: other.to_user_string(),
                span: Some(spanned.span),
            }),
        }
    }

    fn parse_call(&mut self, name: &'static str, name_span: Span) -> Result<Expr, ParseError> {
        // Function must be followed by (
        match self.current().map(|t| &t.token) {
            Some(Token::LeftParen) => self.advance(),
            _ => return Err(self.unexpected(&format!("( after '{name}'"))),
        }
        if matches!(self.current().map(|t| &t.token), Some(Token::RightParen)) {
            return Err(ParseError::WrongArity {
                name: name.to_string(),
                expected: arity_text(name),
                got: 0,
            });
        }

        let args = self.parse_arguments()?;
        self.expect_right_paren()?;

        match Registry::get(name) {
            Some(def) if def.validate_arity(args.len()) => Ok(Expr::func_multi(name, args)),
            Some(def) => Err(ParseError::WrongArity {
                name: name.to_string(),
                expected: def.arity_description(),
                got: args.len(),
            }),
            None => Err(ParseError::UnknownIdentifier {
                name: name.to_string(),
                span: Some(name_span),
            }),
        }
    }

    fn parse_infix(&mut self, left: Expr, op: Operator) -> Result<Expr, ParseError> {
        // Right associative for power, left for others
        let next_precedence = if op.is_right_associative() {
            op.precedence()
        } else {
            op.precedence() + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add_expr(left, right),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::mul_expr(left, right),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow(left, right),
        })
    }
}

fn arity_text(name: &str) -> String {
    Registry::get(name).map_or_else(|| "1".to_string(), |d| d.arity_description())
}
