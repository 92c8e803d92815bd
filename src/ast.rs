//! Syntax tree for a single constraint line
//!
//! This is what the parser produces before lowering into the canonical
//! `Constraint` form. It keeps terms exactly as written: signs, numeric
//! factors and atom factors in source order.

use crate::algebra::Comparison;

/// `guards : lhs cmp rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintSyntax {
    /// `x != y` pairs, verbatim
    pub guards: Vec<(String, String)>,
    pub lhs: Vec<SignedTerm>,
    pub cmp: Comparison,
    pub rhs: Vec<SignedTerm>,
}

/// A product of factors with a leading sign.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedTerm {
    pub negated: bool,
    pub factors: Vec<Factor>,
}

impl SignedTerm {
    /// +1.0 or -1.0
    pub fn sign(&self) -> f64 {
        if self.negated {
            -1.0
        } else {
            1.0
        }
    }
}

/// One multiplicand of a term.
#[derive(Clone, Debug, PartialEq)]
pub enum Factor {
    Number(f64),
    /// `relation(arg, ...)`
    Atom {
        relation: String,
        args: Vec<String>,
    },
}
