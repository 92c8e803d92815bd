//! Proptest generators for kbsdp data structures
//!
//! Provides `Strategy` implementations for constraint text, algebra values
//! and numeric monomials used across the property tests.

#![allow(dead_code)]

use kbsdp::algebra::{AtomPool, Monomial, Polynomial};
use kbsdp::sdp::MonomialKey;
use kbsdp::{Category, GroundNames};
use proptest::collection::vec;
use proptest::prelude::*;

// ============================================================================
// Name Generation
// ============================================================================

/// Generate a valid identifier (lowercase letter first)
pub fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}".prop_map(String::from)
}

/// A small fixed alphabet of relations, so generated terms collide often
pub fn arb_relation() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["function", "reactant", "product", "p", "q"]).prop_map(String::from)
}

/// A small alphabet of constants
pub fn arb_constant() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "g1", "ec_1"]).prop_map(String::from)
}

// ============================================================================
// Constraint Text
// ============================================================================

/// `rel(a, b)` as source text
pub fn arb_atom_text() -> impl Strategy<Value = String> {
    (arb_relation(), vec(arb_constant(), 0..=3))
        .prop_map(|(rel, args)| format!("{}({})", rel, args.join(", ")))
}

/// A coefficient that prints and reparses exactly
pub fn arb_coefficient() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(1.0),
        Just(2.0),
        Just(0.5),
        Just(0.75),
        (1u32..100).prop_map(|n| n as f64),
    ]
}

/// One term as source text: optional coefficient followed by 0..=3 atoms
pub fn arb_term_text() -> impl Strategy<Value = String> {
    (arb_coefficient(), vec(arb_atom_text(), 0..=3)).prop_map(|(c, atoms)| {
        if atoms.is_empty() {
            c.to_string()
        } else {
            format!("{} * {}", c, atoms.join(" * "))
        }
    })
}

/// A full constraint line, optionally with guards
pub fn arb_constraint_text() -> impl Strategy<Value = String> {
    (
        vec((arb_identifier(), arb_identifier()), 0..=2),
        vec((any::<bool>(), arb_term_text()), 1..=4),
        prop::bool::ANY,
    )
        .prop_map(|(guards, terms, eq)| {
            let mut out = String::new();
            if !guards.is_empty() {
                let g: Vec<_> = guards.iter().map(|(x, y)| format!("{} != {}", x, y)).collect();
                out.push_str(&g.join(", "));
                out.push_str(" : ");
            }
            for (i, (neg, term)) in terms.iter().enumerate() {
                match (i, neg) {
                    (0, true) => out.push('-'),
                    (0, false) => {}
                    (_, true) => out.push_str(" - "),
                    (_, false) => out.push_str(" + "),
                }
                out.push_str(term);
            }
            out.push_str(if eq { " = 0" } else { " >= 0" });
            out
        })
}

// ============================================================================
// Algebra Values
// ============================================================================

/// Atom descriptions: (relation, args)
pub fn arb_atom_spec() -> impl Strategy<Value = (String, Vec<String>)> {
    (arb_relation(), vec(arb_constant(), 0..=2))
}

/// Monomial descriptions: atoms with small exponents (zero allowed)
pub fn arb_monomial_spec() -> impl Strategy<Value = Vec<((String, Vec<String>), u32)>> {
    vec((arb_atom_spec(), 0u32..=3), 0..=4)
}

/// Build a monomial from its description in `pool`
pub fn build_monomial(pool: &mut AtomPool, spec: &[((String, Vec<String>), u32)]) -> Monomial {
    let items = spec
        .iter()
        .map(|((rel, args), e)| (pool.intern(rel, args.clone()), *e))
        .collect();
    let mono = Monomial::from_items(items);
    if mono.is_empty() {
        Monomial::constant(pool)
    } else {
        mono
    }
}

/// Polynomial descriptions: (monomial, coefficient) terms
pub fn arb_polynomial_spec() -> impl Strategy<Value = Vec<(Vec<((String, Vec<String>), u32)>, f64)>> {
    vec((arb_monomial_spec(), -4i32..=4), 0..=6)
        .prop_map(|terms| terms.into_iter().map(|(m, c)| (m, c as f64)).collect())
}

/// Build a polynomial by repeated `add_term`
pub fn build_polynomial(
    pool: &mut AtomPool,
    spec: &[(Vec<((String, Vec<String>), u32)>, f64)],
) -> Polynomial {
    let mut poly = Polynomial::new();
    for (mono, c) in spec {
        poly.add_term(build_monomial(pool, mono), *c);
    }
    poly
}

// ============================================================================
// Ground Names
// ============================================================================

/// Gene and enzyme pools of the given maximum sizes
pub fn arb_ground_names(max_genes: usize, max_enzymes: usize) -> impl Strategy<Value = GroundNames> {
    (0..=max_genes, 0..=max_enzymes).prop_map(|(genes, enzymes)| {
        let mut names = GroundNames::new();
        for i in 0..genes {
            names.insert(Category::Gene, format!("g{}", i));
        }
        for i in 0..enzymes {
            names.insert(Category::Enzyme, format!("ec_{}", i));
        }
        names
    })
}

// ============================================================================
// Numeric Monomials
// ============================================================================

pub fn arb_monomial_key() -> impl Strategy<Value = MonomialKey> {
    vec((1u32..=6, 0u32..=3), 0..=4).prop_map(MonomialKey::new)
}

/// A basis of distinct monomials
pub fn arb_basis(max: usize) -> impl Strategy<Value = Vec<MonomialKey>> {
    vec(arb_monomial_key(), 1..=max).prop_map(|mut keys| {
        let mut seen = std::collections::HashSet::new();
        keys.retain(|k| seen.insert(k.clone()));
        keys
    })
}
