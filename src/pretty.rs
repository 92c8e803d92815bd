//! Pretty-printer for canonical constraints
//!
//! Renders algebra values back to constraint syntax, so that printing and
//! re-parsing a constraint gives back the same polynomial. Exponents are
//! written as repeated factors (`a(x) * a(x)`), since the grammar has no
//! power operator.

use std::fmt;

use crate::algebra::{Atom, Comparison, Constraint, Monomial, Polynomial};

/// A pretty-printer accumulating into a string
#[derive(Default)]
pub struct Pretty {
    output: String,
}

impl Pretty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }
}

// ============ Pretty-printing implementations ============

impl Pretty {
    pub fn constraint(&mut self, c: &Constraint) {
        if !c.guards.is_empty() {
            for (i, (x, y)) in c.guards.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(x);
                self.write(" != ");
                self.write(y);
            }
            self.write(" : ");
        }
        self.polynomial(&c.poly);
        self.write(match c.cmp {
            Comparison::GeZero => " >= 0",
            Comparison::EqZero => " = 0",
        });
    }

    pub fn polynomial(&mut self, p: &Polynomial) {
        if p.is_empty() {
            self.write("0");
            return;
        }
        for (i, (mono, coef)) in p.terms().iter().enumerate() {
            match (i, *coef < 0.0) {
                (0, false) => {}
                (0, true) => self.write("-"),
                (_, false) => self.write(" + "),
                (_, true) => self.write(" - "),
            }
            self.term(mono, coef.abs());
        }
    }

    /// `|coef| * mono`, omitting a unit coefficient
    fn term(&mut self, mono: &Monomial, magnitude: f64) {
        if mono.is_constant() {
            self.write(&magnitude.to_string());
            return;
        }
        if magnitude != 1.0 {
            self.write(&magnitude.to_string());
            self.write(" * ");
        }
        self.monomial(mono);
    }

    pub fn monomial(&mut self, m: &Monomial) {
        if m.is_constant() {
            self.write("1");
            return;
        }
        for (i, atom) in m.expanded_atoms().enumerate() {
            if i > 0 {
                self.write(" * ");
            }
            self.atom(atom);
        }
    }

    pub fn atom(&mut self, a: &Atom) {
        self.write(&a.key());
    }
}

/// Render a constraint as re-parseable text
pub fn pretty_print(c: &Constraint) -> String {
    let mut p = Pretty::new();
    p.constraint(c);
    p.finish()
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print(self))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut p = Pretty::new();
        p.polynomial(self);
        f.write_str(&p.finish())
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut p = Pretty::new();
        p.monomial(self);
        f.write_str(&p.finish())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
