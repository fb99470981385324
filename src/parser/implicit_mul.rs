//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::error::Span;
use crate::parser::tokens::{Operator, Spanned, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Function name followed by ( is a call, never a product
        (Token::Function(_), _) => false,

        // Number / Identifier / ) before a function: 4 sin(x), x cos(x), (a) ln(x)
        (Token::Number(_) | Token::Identifier(_) | Token::RightParen, Token::Function(_)) => true,

        // Number * Identifier: 2x
        // Number * (: 2(x)
        // Identifier * Identifier: x pi
        // Identifier * (: x(x+1), identifiers are never callable
        // Identifier * Number: x2
        // ) * Identifier: )x
        // ) * Number: )2
        // ) * (: )(
        (
            Token::Number(_) | Token::Identifier(_) | Token::RightParen,
            Token::Identifier(_) | Token::LeftParen,
        )
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// The inserted operator takes the empty span at the start of the right-hand token.
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Spanned>) -> Vec<Spanned> {
    // Check if any insertion is needed before allocating new vector
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0].token, &w[1].token));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let inserted_at = it
            .peek()
            .filter(|next| should_insert_mul(&current.token, &next.token))
            .map(|next| next.span.start);

        result.push(current);
        if let Some(pos) = inserted_at {
            result.push(Spanned::new(
                Token::Operator(Operator::Mul),
                Span::new(pos, pos),
            ));
        }
    }

    result
}
