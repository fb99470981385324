//! Lexer: formula text to spanned tokens
//!
//! Letters are grouped into runs and resolved against the function registry and
//! the named constants. A run that is neither, and longer than one letter, is
//! rejected rather than split into implicit products.

use super::tokens::{Operator, Spanned, Token};
use crate::ast::known_constant;
use crate::error::{ParseError, Span};
use crate::functions::registry::Registry;

/// Check parenthesis balance, reporting the first offending position
pub(crate) fn check_parentheses(input: &str) -> Result<(), ParseError> {
    let mut open = Vec::new();
    for (pos, c) in input.char_indices() {
        match c {
            '(' => open.push(pos),
            ')' => {
                if open.pop().is_none() {
                    return Err(ParseError::UnbalancedParentheses {
                        span: Some(Span::at(pos)),
                    });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(pos) => Err(ParseError::UnbalancedParentheses {
            span: Some(Span::at(pos)),
        }),
        None => Ok(()),
    }
}

/// Split the input into tokens
pub(crate) fn lex(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::with_capacity(input.len());
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map_or(input.len(), |(p, _)| *p);
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            i = scan_number(&chars, i);
            let text = &input[pos..end_of(i)];
            let span = Span::new(pos, end_of(i));
            let value = text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                value: text.to_string(),
                span: Some(span),
            })?;
            tokens.push(Spanned::new(Token::Number(value), span));
            continue;
        }

        if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].1.is_alphabetic() {
                i += 1;
            }
            let word = &input[chars[start].0..end_of(i)];
            let span = Span::new(pos, end_of(i));
            tokens.push(Spanned::new(classify_word(word, span)?, span));
            continue;
        }

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            _ => match Operator::from_char(c) {
                Some(op) => Token::Operator(op),
                None => {
                    return Err(ParseError::InvalidToken {
                        token: c.to_string(),
                        span: Some(Span::new(pos, end_of(i + 1))),
                    })
                }
            },
        };
        tokens.push(Spanned::new(token, Span::new(pos, end_of(i + 1))));
        i += 1;
    }

    Ok(tokens)
}

/// Advance over `digits[.digits][(e|E)[+|-]digits]`, returning the end index
fn scan_number(chars: &[(usize, char)], mut i: usize) -> usize {
    let at = |i: usize| chars.get(i).map(|(_, c)| *c);

    while at(i).is_some_and(|c| c.is_ascii_digit() || c == '.') {
        i += 1;
    }

    // Exponent only when digits follow, so `2e` stays `2 * e`
    if matches!(at(i), Some('e' | 'E')) {
        let mut j = i + 1;
        if matches!(at(j), Some('+' | '-')) {
            j += 1;
        }
        if at(j).is_some_and(|c| c.is_ascii_digit()) {
            i = j;
            while at(i).is_some_and(|c| c.is_ascii_digit()) {
                i += 1;
            }
        }
    }
    i
}

fn classify_word(word: &str, span: Span) -> Result<Token, ParseError> {
    if let Some(def) = Registry::get(word) {
        return Ok(Token::Function(def.name));
    }
    if known_constant(word).is_some() || word.chars().count() == 1 {
        return Ok(Token::Identifier(word.to_string()));
    }
    Err(ParseError::UnknownIdentifier {
        name: word.to_string(),
        span: Some(span),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("3.25"), vec![Token::Number(3.25)]);
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("1e-3"), vec![Token::Number(0.001)]);
        assert_eq!(kinds("2.5E+2"), vec![Token::Number(250.0)]);
    }

    #[test]
    fn test_trailing_e_is_constant() {
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Identifier("e".into())]
        );
    }

    #[test]
    fn test_functions_and_operators() {
        assert_eq!(
            kinds("sqrt(x)^2"),
            vec![
                Token::Function("sqrt"),
                Token::LeftParen,
                Token::Identifier("x".into()),
                Token::RightParen,
                Token::Operator(Operator::Pow),
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_spans_point_at_source() {
        let tokens = lex("x + 10").unwrap();
        assert_eq!(tokens[2].span, Span::new(4, 6));
    }

    #[test]
    fn test_invalid_character() {
        let err = lex("x $ 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidToken {
                token: "$".into(),
                span: Some(Span::at(2)),
            }
        );
    }

    #[test]
    fn test_unknown_word() {
        assert!(matches!(
            lex("2*foo"),
            Err(ParseError::UnknownIdentifier { ref name, .. }) if name == "foo"
        ));
    }

    #[test]
    fn test_malformed_number() {
        assert!(matches!(lex("1.2.3"), Err(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn test_parenthesis_balance() {
        assert!(check_parentheses("(x+1)*(x-1)").is_ok());
        assert_eq!(
            check_parentheses("(x+1))"),
            Err(ParseError::UnbalancedParentheses {
                span: Some(Span::at(5))
            })
        );
        assert_eq!(
            check_parentheses("((x+1)"),
            Err(ParseError::UnbalancedParentheses {
                span: Some(Span::at(0))
            })
        );
    }
}
