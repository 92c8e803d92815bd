//! Unit tests for lexer and parser

use chumsky::Parser;
use kbsdp::algebra::{AtomPool, Comparison, Monomial};
use kbsdp::ast::{Factor, SignedTerm};
use kbsdp::error::ParseError;
use kbsdp::lexer::{lexer, Token};
use kbsdp::parser::parse_syntax;
use kbsdp::{parse_constraint, pretty_print};

fn tokens(input: &str) -> Vec<Token> {
    lexer()
        .parse(input)
        .unwrap()
        .into_iter()
        .map(|(t, _)| t)
        .collect()
}

fn ident(s: &str) -> Token {
    Token::Ident(s.to_string())
}

// ============================================================================
// Lexer tests
// ============================================================================

#[test]
fn test_lex_guarded_constraint() {
    assert_eq!(
        tokens("x != y : function(x,e) >= 0"),
        vec![
            ident("x"),
            Token::Neq,
            ident("y"),
            Token::Colon,
            ident("function"),
            Token::LParen,
            ident("x"),
            Token::Comma,
            ident("e"),
            Token::RParen,
            Token::Ge,
            Token::Number("0".to_string()),
        ]
    );
}

#[test]
fn test_lex_numbers() {
    assert_eq!(
        tokens("2 0.75 .5 3."),
        vec![
            Token::Number("2".to_string()),
            Token::Number("0.75".to_string()),
            Token::Number(".5".to_string()),
            Token::Number("3.".to_string()),
        ]
    );
}

#[test]
fn test_lex_two_char_operators_before_eq() {
    assert_eq!(tokens(">= = !="), vec![Token::Ge, Token::Eq, Token::Neq]);
}

#[test]
fn test_lex_spans() {
    let spanned = lexer().parse("p(a) - 1").unwrap();
    let spans: Vec<_> = spanned.into_iter().map(|(_, s)| s).collect();
    assert_eq!(spans, vec![0..1, 1..2, 2..3, 3..4, 5..6, 7..8]);
}

#[test]
fn test_lex_rejects_unknown_character() {
    let result = lexer().parse("p(a) ^ 2 >= 0");
    assert!(result.is_err());
}

// ============================================================================
// Syntax tests
// ============================================================================

#[test]
fn test_parse_syntax_guard_and_terms() {
    let syntax = parse_syntax("x != y : function(x,e) - function(y,e) >= 0").unwrap();
    assert_eq!(syntax.guards, vec![("x".to_string(), "y".to_string())]);
    assert_eq!(syntax.cmp, Comparison::GeZero);
    assert_eq!(
        syntax.lhs,
        vec![
            SignedTerm {
                negated: false,
                factors: vec![Factor::Atom {
                    relation: "function".to_string(),
                    args: vec!["x".to_string(), "e".to_string()],
                }],
            },
            SignedTerm {
                negated: true,
                factors: vec![Factor::Atom {
                    relation: "function".to_string(),
                    args: vec!["y".to_string(), "e".to_string()],
                }],
            },
        ]
    );
}

#[test]
fn test_parse_syntax_juxtaposed_factors() {
    let syntax = parse_syntax("2 p(a) q(b) = 1").unwrap();
    assert_eq!(syntax.lhs.len(), 1);
    assert_eq!(syntax.lhs[0].factors.len(), 3);
    assert_eq!(syntax.lhs[0].factors[0], Factor::Number(2.0));
}

#[test]
fn test_parse_syntax_numeric_argument() {
    let syntax = parse_syntax("level(g1, 3) >= 0").unwrap();
    assert_eq!(
        syntax.lhs[0].factors[0],
        Factor::Atom {
            relation: "level".to_string(),
            args: vec!["g1".to_string(), "3".to_string()],
        }
    );
}

#[test]
fn test_parse_multiple_guards() {
    let syntax = parse_syntax("x != y, y != z : p(x) >= 0").unwrap();
    assert_eq!(syntax.guards.len(), 2);
}

// ============================================================================
// Lowering tests
// ============================================================================

#[test]
fn test_scenario_two_guarded_difference() {
    let mut pool = AtomPool::new();
    let c = parse_constraint("x != y : function(x,e) - function(y,e) >= 0", &mut pool).unwrap();

    assert_eq!(c.cmp, Comparison::GeZero);
    assert_eq!(c.guards, vec![("x".to_string(), "y".to_string())]);
    assert_eq!(c.poly.len(), 2);

    let fx = Monomial::from_atom(pool.intern("function", vec!["x".into(), "e".into()]));
    let fy = Monomial::from_atom(pool.intern("function", vec!["y".into(), "e".into()]));
    assert_eq!(c.poly.coefficient(&fx), 1.0);
    assert_eq!(c.poly.coefficient(&fy), -1.0);
}

#[test]
fn test_rhs_is_moved_to_lhs() {
    let mut pool = AtomPool::new();
    let c = parse_constraint("p(a) = 0.75", &mut pool).unwrap();
    let one = Monomial::constant(&pool);
    let pa = Monomial::from_atom(pool.intern("p", vec!["a".into()]));

    assert_eq!(c.cmp, Comparison::EqZero);
    assert_eq!(c.poly.coefficient(&pa), 1.0);
    assert_eq!(c.poly.coefficient(&one), -0.75);
}

#[test]
fn test_like_terms_merge_and_cancel() {
    let mut pool = AtomPool::new();
    let c = parse_constraint("2 p(a) + 3 * p(a) - 5 p(a) + q(b) >= 0", &mut pool).unwrap();
    assert_eq!(c.poly.len(), 1);
    assert_eq!(pretty_print(&c), "q(b) >= 0");
}

#[test]
fn test_repeated_atom_becomes_exponent() {
    let mut pool = AtomPool::new();
    let c = parse_constraint("p(a) * p(a) * q(b) >= 0", &mut pool).unwrap();
    let (mono, coef) = &c.poly.terms()[0];
    assert_eq!(*coef, 1.0);
    assert_eq!(mono.degree(), 3);
    assert_eq!(mono.len(), 2);
}

#[test]
fn test_atoms_shared_through_pool() {
    let mut pool = AtomPool::new();
    let c1 = parse_constraint("p(a) >= 0", &mut pool).unwrap();
    let c2 = parse_constraint("1 - p(a) >= 0", &mut pool).unwrap();
    let a1 = c1.atoms().next().unwrap().clone();
    let a2 = c2.atoms().next().unwrap().clone();
    assert!(a1.same_instance(&a2));
}

// ============================================================================
// Pretty-printing
// ============================================================================

#[test]
fn test_pretty_print_forms() {
    let mut pool = AtomPool::new();
    let cases = [
        ("x != y : function(x,e) - function(y,e) >= 0", "x != y : function(x,e) - function(y,e) >= 0"),
        ("p(a) = 0.75", "-0.75 + p(a) = 0"),
        ("2 * p(a) * p(a) >= 1", "-1 + 2 * p(a) * p(a) >= 0"),
        ("p(a) - p(a) = 0", "0 = 0"),
    ];
    for (input, expected) in cases {
        let c = parse_constraint(input, &mut pool).unwrap();
        assert_eq!(pretty_print(&c), expected, "input: {}", input);
    }
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn test_error_missing_comparison() {
    let mut pool = AtomPool::new();
    let err = parse_constraint("p(a) + q(b)", &mut pool).unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
    assert!(err.message().contains("end of input"), "{}", err.message());
}

#[test]
fn test_error_unclosed_paren() {
    let mut pool = AtomPool::new();
    let err = parse_constraint("p(a >= 0", &mut pool).unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_error_lexical() {
    let mut pool = AtomPool::new();
    let err = parse_constraint("p(a) ^ 2 >= 0", &mut pool).unwrap_err();
    assert!(matches!(err, ParseError::Lex { .. }));
    assert_eq!(err.input(), "p(a) ^ 2 >= 0");
    assert!(err.message().contains('^'));
}

#[test]
fn test_error_trailing_tokens() {
    let mut pool = AtomPool::new();
    assert!(parse_constraint("p(a) >= 0 )", &mut pool).is_err());
}

#[test]
fn test_error_guard_without_colon() {
    let mut pool = AtomPool::new();
    assert!(parse_constraint("x != y p(x) >= 0", &mut pool).is_err());
}

#[test]
fn test_error_report_renders_source() {
    let mut pool = AtomPool::new();
    let err = parse_constraint("p(a) >= ", &mut pool).unwrap_err();
    match err {
        ParseError::Syntax { report, .. } => assert!(report.contains("p(a) >=")),
        other => panic!("expected syntax error, got {:?}", other),
    }
}
