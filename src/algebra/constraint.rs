//! Constraints: a polynomial compared against zero, with optional guards

use std::collections::BTreeSet;

use crate::algebra::atom::Atom;
use crate::algebra::polynomial::Polynomial;

/// Comparison against zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `p = 0`
    EqZero,
    /// `p >= 0`
    GeZero,
}

/// `guards : poly cmp 0`.
///
/// A guard `(x, y)` is the side condition `x != y` on two free variables.
/// Structural equality covers all three parts, so two constraints read from
/// different lines compare equal when they mean the same thing after
/// canonicalization.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub poly: Polynomial,
    pub cmp: Comparison,
    pub guards: Vec<(String, String)>,
}

impl Constraint {
    pub fn new(poly: Polynomial, cmp: Comparison) -> Self {
        Self {
            poly,
            cmp,
            guards: Vec::new(),
        }
    }

    pub fn with_guards(mut self, guards: Vec<(String, String)>) -> Self {
        self.guards = guards;
        self
    }

    /// Every non-zero atom in the polynomial, in term order, with repeats.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.poly.terms().iter().flat_map(|(m, _)| m.atoms())
    }

    /// Distinct argument names occurring anywhere in the polynomial.
    pub fn argument_names(&self) -> BTreeSet<&str> {
        self.atoms()
            .flat_map(|a| a.args().iter().map(String::as_str))
            .collect()
    }

    /// True if every guard holds under `lookup`. Guards naming a variable
    /// that `lookup` cannot resolve are compared by name.
    pub fn guards_hold<'a, F>(&'a self, mut lookup: F) -> bool
    where
        F: FnMut(&'a str) -> Option<&'a str>,
    {
        self.guards.iter().all(|(x, y)| {
            let xv = lookup(x.as_str()).unwrap_or(x.as_str());
            let yv = lookup(y.as_str()).unwrap_or(y.as_str());
            xv != yv
        })
    }
}
