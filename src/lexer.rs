//! Lexer for the constraint language
//!
//! Tokenizes a single constraint line into a stream for the parser.

use chumsky::prelude::*;
use std::ops::Range;

/// Token types for constraints
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    // Identifiers and literals
    Ident(String),
    /// Decimal literal, kept as written (`2`, `0.75`, `.5`)
    Number(String),

    // Operators and punctuation
    Plus,   // +
    Minus,  // -
    Star,   // *
    LParen, // (
    RParen, // )
    Comma,  // ,
    Colon,  // :
    Ge,     // >=
    Eq,     // =
    Neq,    // !=
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{}", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Ge => write!(f, ">="),
            Token::Eq => write!(f, "="),
            Token::Neq => write!(f, "!="),
        }
    }
}

/// Type alias for spans
pub type Span = Range<usize>;

/// Create a lexer for constraint text
pub fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let ident = text::ident().map(Token::Ident);

    // `12`, `12.`, `12.5`, `.5`
    let integral = text::digits(10)
        .then(just('.').ignore_then(text::digits(10).or_not()).or_not())
        .map(|(int, frac): (String, Option<Option<String>>)| match frac {
            None => int,
            Some(None) => format!("{}.", int),
            Some(Some(frac)) => format!("{}.{}", int, frac),
        });
    let leading_dot = just('.')
        .ignore_then(text::digits(10))
        .map(|frac: String| format!(".{}", frac));
    let number = integral.or(leading_dot).map(Token::Number);

    // Two-character operators must be tried before `=`
    let operator = choice((
        just(">=").to(Token::Ge),
        just("!=").to(Token::Neq),
        just('=').to(Token::Eq),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just(':').to(Token::Colon),
    ));

    choice((ident, number, operator))
        .map_with_span(|tok, span| (tok, span))
        .padded()
        .repeated()
        .then_ignore(end())
}

// Unit tests live in tests/unit_parsing.rs
