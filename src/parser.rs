//! Parser for the constraint language
//!
//! Parses a token stream into `ConstraintSyntax`, then lowers it into a
//! canonical `Constraint` with atoms interned in the caller's `AtomPool`.
//!
//! Grammar:
//! ```text
//! constraint := [guard (',' guard)* ':'] sum cmp sum
//! guard      := IDENT '!=' IDENT
//! cmp        := '>=' | '='
//! sum        := ['+'|'-'] term (('+'|'-') term)*
//! term       := factor ('*'? factor)*
//! factor     := IDENT '(' args ')' | NUMBER
//! ```

use chumsky::prelude::*;
use chumsky::Stream;

use crate::algebra::{AtomPool, Comparison, Constraint, Monomial, Polynomial};
use crate::ast::*;
use crate::error::{lexer_error, parser_error, ParseError};
use crate::lexer::{lexer, Token};

/// Create a parser for one constraint
pub fn parser() -> impl Parser<Token, ConstraintSyntax, Error = Simple<Token>> + Clone {
    let guards = guard()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .then_ignore(just(Token::Colon))
        .or_not()
        .map(Option::unwrap_or_default);

    guards
        .then(sum())
        .then(comparison())
        .then(sum())
        .then_ignore(end())
        .map(|(((guards, lhs), cmp), rhs)| ConstraintSyntax {
            guards,
            lhs,
            cmp,
            rhs,
        })
}

// ============================================================================
// Helpers
// ============================================================================

fn ident() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! { Token::Ident(s) => s }
}

fn number() -> impl Parser<Token, f64, Error = Simple<Token>> + Clone {
    select! { Token::Number(n) => n }.try_map(|n: String, span| {
        n.parse::<f64>()
            .map_err(|_| Simple::custom(span, format!("invalid number `{}`", n)))
    })
}

/// `x != y`
fn guard() -> impl Parser<Token, (String, String), Error = Simple<Token>> + Clone {
    ident().then_ignore(just(Token::Neq)).then(ident())
}

fn comparison() -> impl Parser<Token, Comparison, Error = Simple<Token>> + Clone {
    choice((
        just(Token::Ge).to(Comparison::GeZero),
        just(Token::Eq).to(Comparison::EqZero),
    ))
}

// ============================================================================
// Terms
// ============================================================================

/// `rel(a, b)` or a numeric literal
fn factor() -> impl Parser<Token, Factor, Error = Simple<Token>> + Clone {
    // Arguments are symbols; numeric constants are accepted as names too.
    let arg = ident().or(select! { Token::Number(n) => n });
    let atom = ident()
        .then(
            arg.separated_by(just(Token::Comma))
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        )
        .map(|(relation, args)| Factor::Atom { relation, args });

    atom.or(number().map(Factor::Number))
}

/// Factors joined by `*` or plain juxtaposition
fn term() -> impl Parser<Token, Vec<Factor>, Error = Simple<Token>> + Clone {
    factor()
        .then(just(Token::Star).or_not().ignore_then(factor()).repeated())
        .map(|(first, rest)| {
            let mut factors = Vec::with_capacity(1 + rest.len());
            factors.push(first);
            factors.extend(rest);
            factors
        })
}

fn sum() -> impl Parser<Token, Vec<SignedTerm>, Error = Simple<Token>> + Clone {
    let sign = choice((just(Token::Plus).to(false), just(Token::Minus).to(true)));

    let first = sign
        .clone()
        .or_not()
        .then(term())
        .map(|(negated, factors)| SignedTerm {
            negated: negated.unwrap_or(false),
            factors,
        });
    let rest = sign
        .then(term())
        .map(|(negated, factors)| SignedTerm { negated, factors });

    first.then(rest.repeated()).map(|(first, mut rest)| {
        rest.insert(0, first);
        rest
    })
}

// ============================================================================
// Entry points
// ============================================================================

/// Lex and parse one constraint line into its syntax tree
pub fn parse_syntax(input: &str) -> Result<ConstraintSyntax, ParseError> {
    let tokens = lexer()
        .parse(input)
        .map_err(|errs| lexer_error(input, errs))?;

    let len = input.chars().count();
    parser()
        .parse(Stream::from_iter(len..len + 1, tokens.clone().into_iter()))
        .map_err(|errs| parser_error(input, errs, &tokens))
}

/// Parse one constraint line into canonical form, interning its atoms in `pool`
pub fn parse_constraint(input: &str, pool: &mut AtomPool) -> Result<Constraint, ParseError> {
    let syntax = parse_syntax(input)?;
    Ok(lower(&syntax, pool))
}

/// Build the canonical constraint `lhs - rhs cmp 0`
pub fn lower(syntax: &ConstraintSyntax, pool: &mut AtomPool) -> Constraint {
    let mut poly = Polynomial::new();
    for (side, side_sign) in [(&syntax.lhs, 1.0), (&syntax.rhs, -1.0)] {
        for term in side {
            let (mono, coef) = lower_term(term, pool);
            poly.add_term(mono, coef * term.sign() * side_sign);
        }
    }
    Constraint::new(poly, syntax.cmp).with_guards(syntax.guards.clone())
}

fn lower_term(term: &SignedTerm, pool: &mut AtomPool) -> (Monomial, f64) {
    let mut coef = 1.0;
    let mut mono = Monomial::constant(pool);
    for factor in &term.factors {
        match factor {
            Factor::Number(n) => coef *= n,
            Factor::Atom { relation, args } => {
                let atom = pool.intern(relation, args.clone());
                mono = mono.multiply(&Monomial::from_atom(atom));
            }
        }
    }
    (mono, coef)
}

// Unit tests live in tests/unit_parsing.rs
