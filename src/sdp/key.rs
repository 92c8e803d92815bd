//! Monomials over numeric variable indices

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{Exponent, VarIndex};

/// A monomial as sorted `(variable index, exponent)` pairs.
///
/// The empty key is the constant monomial. Keys built through `new` are
/// sorted by variable index with no repeated index and no zero exponent;
/// `merge` of two such keys keeps that. Deserialized keys go through `new`,
/// so any spelling of a monomial lands on the same key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<(VarIndex, Exponent)>", into = "Vec<(VarIndex, Exponent)>")]
pub struct MonomialKey(Vec<(VarIndex, Exponent)>);

impl From<Vec<(VarIndex, Exponent)>> for MonomialKey {
    fn from(terms: Vec<(VarIndex, Exponent)>) -> Self {
        Self::new(terms)
    }
}

impl From<MonomialKey> for Vec<(VarIndex, Exponent)> {
    fn from(key: MonomialKey) -> Self {
        key.0
    }
}

impl MonomialKey {
    /// Build a key from pairs in any order, merging repeated indices.
    pub fn new(mut terms: Vec<(VarIndex, Exponent)>) -> Self {
        terms.retain(|&(_, e)| e > 0);
        terms.sort_unstable_by_key(|&(v, _)| v);
        let mut merged: Vec<(VarIndex, Exponent)> = Vec::with_capacity(terms.len());
        for (v, e) in terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == v => *acc += e,
                _ => merged.push((v, e)),
            }
        }
        Self(merged)
    }

    /// The constant monomial.
    pub fn constant() -> Self {
        Self(Vec::new())
    }

    /// `x_var`
    pub fn var(var: VarIndex) -> Self {
        Self(vec![(var, 1)])
    }

    pub fn terms(&self) -> &[(VarIndex, Exponent)] {
        &self.0
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> Exponent {
        self.0.iter().map(|&(_, e)| e).sum()
    }

    /// Product of two monomials: sorted merge, adding exponents of shared
    /// variables.
    pub fn merge(&self, other: &MonomialKey) -> MonomialKey {
        if self.0.is_empty() {
            return other.clone();
        }
        if other.0.is_empty() {
            return self.clone();
        }
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push((a[i].0, a[i].1 + b[j].1));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        MonomialKey(out)
    }

    /// This monomial squared.
    pub fn squared(&self) -> MonomialKey {
        MonomialKey(self.0.iter().map(|&(v, e)| (v, 2 * e)).collect())
    }
}

impl fmt::Display for MonomialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        for (i, (v, e)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "x{}", v)?;
            if *e > 1 {
                write!(f, "^{}", e)?;
            }
        }
        Ok(())
    }
}
