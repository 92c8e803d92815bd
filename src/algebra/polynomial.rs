//! Polynomials as sorted coefficient maps over monomials

use crate::algebra::atom::AtomPool;
use crate::algebra::monomial::Monomial;

/// A real-coefficient polynomial.
///
/// Terms are kept sorted by monomial order with no duplicate monomials and no
/// coefficient that is exactly zero. `add_term` preserves that; `canonicalize`
/// restores it after bulk edits through `terms_mut`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    terms: Vec<(Monomial, f64)>,
}

impl Polynomial {
    pub fn new() -> Self {
        Self::default()
    }

    /// The constant polynomial `c`.
    pub fn constant(pool: &AtomPool, c: f64) -> Self {
        let mut p = Self::new();
        p.add_term(Monomial::constant(pool), c);
        p
    }

    pub fn terms(&self) -> &[(Monomial, f64)] {
        &self.terms
    }

    /// Raw access for bulk edits. Call `canonicalize` afterwards.
    pub fn terms_mut(&mut self) -> &mut Vec<(Monomial, f64)> {
        &mut self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient of `mono`, or 0.
    pub fn coefficient(&self, mono: &Monomial) -> f64 {
        self.terms
            .binary_search_by(|(m, _)| m.cmp(mono))
            .map(|i| self.terms[i].1)
            .unwrap_or(0.0)
    }

    /// Maximum total degree over all terms.
    pub fn degree(&self) -> u32 {
        self.terms.iter().map(|(m, _)| m.degree()).max().unwrap_or(0)
    }

    /// Add `c * mono`, merging with an existing term. A coefficient that sums
    /// to exactly zero removes the term.
    pub fn add_term(&mut self, mono: Monomial, c: f64) {
        if c == 0.0 {
            return;
        }
        match self.terms.binary_search_by(|(m, _)| m.cmp(&mono)) {
            Ok(i) => {
                self.terms[i].1 += c;
                if self.terms[i].1 == 0.0 {
                    self.terms.remove(i);
                }
            }
            Err(i) => self.terms.insert(i, (mono, c)),
        }
        debug_assert!(self.is_canonical());
    }

    /// Add `factor * other` term by term.
    pub fn add_scaled(&mut self, other: &Polynomial, factor: f64) {
        for (m, c) in &other.terms {
            self.add_term(m.clone(), c * factor);
        }
    }

    /// Sort terms, merge equal monomials, drop zero coefficients.
    pub fn canonicalize(&mut self) {
        for (m, _) in self.terms.iter_mut() {
            m.canonicalize();
        }
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged: Vec<(Monomial, f64)> = Vec::with_capacity(self.terms.len());
        for (mono, c) in self.terms.drain(..) {
            match merged.last_mut() {
                Some((last, acc)) if *last == mono => *acc += c,
                _ => merged.push((mono, c)),
            }
        }
        merged.retain(|(_, c)| *c != 0.0);
        self.terms = merged;
    }

    /// Strictly increasing monomials and no zero coefficients.
    pub fn is_canonical(&self) -> bool {
        self.terms.windows(2).all(|w| w[0].0 < w[1].0) && self.terms.iter().all(|(_, c)| *c != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::atom::Atom;

    fn atom(pool: &mut AtomPool, rel: &str) -> Atom {
        pool.intern(rel, vec!["x".to_string()])
    }

    #[test]
    fn add_term_merges_and_cancels() {
        let mut pool = AtomPool::new();
        let a = Monomial::from_atom(atom(&mut pool, "a"));
        let b = Monomial::from_atom(atom(&mut pool, "b"));
        let mut p = Polynomial::new();
        p.add_term(b.clone(), 1.0);
        p.add_term(a.clone(), 2.0);
        p.add_term(b.clone(), 0.0);
        assert_eq!(p.len(), 2);
        assert_eq!(p.terms()[0].0, a);

        p.add_term(a.clone(), -2.0);
        assert_eq!(p.len(), 1);
        assert_eq!(p.coefficient(&a), 0.0);
        assert_eq!(p.coefficient(&b), 1.0);
    }

    #[test]
    fn canonicalize_repairs_bulk_edits() {
        let mut pool = AtomPool::new();
        let a = Monomial::from_atom(atom(&mut pool, "a"));
        let one = Monomial::constant(&pool);
        let mut p = Polynomial::new();
        p.terms_mut().push((a.clone(), 1.0));
        p.terms_mut().push((one.clone(), 3.0));
        p.terms_mut().push((a.clone(), -1.0));
        p.canonicalize();
        assert_eq!(p.terms(), &[(one, 3.0)]);
        assert!(p.is_canonical());
    }

    #[test]
    fn constant_polynomial_has_degree_zero() {
        let pool = AtomPool::new();
        let p = Polynomial::constant(&pool, 0.5);
        assert_eq!(p.degree(), 0);
        assert!(Polynomial::constant(&pool, 0.0).is_empty());
    }
}
