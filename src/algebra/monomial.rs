//! Monomials over atoms

use std::cmp::Ordering;

use crate::algebra::atom::{Atom, AtomPool};
use crate::id::Exponent;

/// A product of atoms with positive integer exponents.
///
/// Canonical form: items sorted by atom, no atom repeated, no zero exponents.
/// The monomial consisting of the zero atom with exponent 1 is the constant
/// monomial; polynomial constant terms hang off it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Monomial {
    items: Vec<(Atom, Exponent)>,
}

impl Monomial {
    /// The constant monomial.
    pub fn constant(pool: &AtomPool) -> Self {
        Self {
            items: vec![(pool.zero(), 1)],
        }
    }

    /// A single atom raised to the first power.
    pub fn from_atom(atom: Atom) -> Self {
        Self {
            items: vec![(atom, 1)],
        }
    }

    /// Build a monomial from arbitrary (atom, exponent) pairs and canonicalize it.
    pub fn from_items(items: Vec<(Atom, Exponent)>) -> Self {
        let mut mono = Self { items };
        mono.canonicalize();
        mono
    }

    pub fn items(&self) -> &[(Atom, Exponent)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True for the constant monomial.
    pub fn is_constant(&self) -> bool {
        self.items.len() == 1 && self.items[0].0.is_zero()
    }

    /// Total degree. The constant monomial has degree 0.
    pub fn degree(&self) -> Exponent {
        if self.is_constant() {
            return 0;
        }
        self.items.iter().map(|(_, e)| *e).sum()
    }

    /// Distinct non-zero atoms, in canonical order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.items
            .iter()
            .map(|(a, _)| a)
            .filter(|a| !a.is_zero())
    }

    /// Non-zero atoms repeated by exponent, e.g. `a^2 b` yields `a, a, b`.
    pub fn expanded_atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.items
            .iter()
            .filter(|(a, _)| !a.is_zero())
            .flat_map(|(a, e)| std::iter::repeat(a).take(*e as usize))
    }

    /// Sort by atom, merge repeated atoms by adding exponents, drop zero
    /// exponents. Zero atoms are dropped when any real atom is present.
    pub fn canonicalize(&mut self) {
        self.items.retain(|(_, e)| *e > 0);
        if self.items.iter().any(|(a, _)| !a.is_zero()) {
            self.items.retain(|(a, _)| !a.is_zero());
        }
        self.items.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged: Vec<(Atom, Exponent)> = Vec::with_capacity(self.items.len());
        for (atom, exp) in self.items.drain(..) {
            match merged.last_mut() {
                Some((last, e)) if *last == atom => *e += exp,
                _ => merged.push((atom, exp)),
            }
        }
        // The zero atom stands for 1, so 1*1 stays the constant monomial.
        if let [(a, e)] = merged.as_mut_slice() {
            if a.is_zero() {
                *e = 1;
            }
        }
        self.items = merged;
    }

    /// Product of two monomials. The constant monomial is the identity.
    pub fn multiply(&self, other: &Monomial) -> Monomial {
        if self.is_constant() {
            return other.clone();
        }
        if other.is_constant() {
            return self.clone();
        }
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        items.extend(self.items.iter().cloned());
        items.extend(other.items.iter().cloned());
        Monomial::from_items(items)
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Monomial {
    /// Fewer items first, then item-wise by (atom, exponent).
    fn cmp(&self, other: &Self) -> Ordering {
        self.items
            .len()
            .cmp(&other.items.len())
            .then_with(|| self.items.cmp(&other.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(pool: &mut AtomPool, rel: &str, args: &[&str]) -> Atom {
        pool.intern(rel, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn canonicalize_merges_and_sorts() {
        let mut pool = AtomPool::new();
        let a = atom(&mut pool, "a", &["x"]);
        let b = atom(&mut pool, "b", &["x"]);
        let m = Monomial::from_items(vec![(b.clone(), 1), (a.clone(), 2), (b.clone(), 3)]);
        assert_eq!(m.items(), &[(a, 2), (b, 4)]);
        assert_eq!(m.degree(), 6);
    }

    #[test]
    fn constant_is_multiplicative_identity() {
        let mut pool = AtomPool::new();
        let one = Monomial::constant(&pool);
        let a = Monomial::from_atom(atom(&mut pool, "a", &["x"]));
        assert_eq!(one.multiply(&a), a);
        assert_eq!(a.multiply(&one), a);
        assert!(one.multiply(&one).is_constant());
        assert_eq!(one.degree(), 0);
    }

    #[test]
    fn multiply_adds_exponents() {
        let mut pool = AtomPool::new();
        let a = atom(&mut pool, "a", &["x"]);
        let m = Monomial::from_atom(a.clone());
        let sq = m.multiply(&m);
        assert_eq!(sq.items(), &[(a.clone(), 2)]);
        let expanded: Vec<_> = sq.expanded_atoms().cloned().collect();
        assert_eq!(expanded, vec![a.clone(), a]);
    }

    #[test]
    fn shorter_monomials_sort_first() {
        let mut pool = AtomPool::new();
        let z = atom(&mut pool, "z", &[]);
        let a = atom(&mut pool, "a", &[]);
        let b = atom(&mut pool, "b", &[]);
        let single = Monomial::from_atom(z);
        let pair = Monomial::from_items(vec![(a, 1), (b, 1)]);
        assert!(single < pair);
        assert!(Monomial::constant(&pool) < single);
    }
}
