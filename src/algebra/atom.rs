//! Relational atoms and the hash-consing pool
//!
//! An `Atom` is a shared handle to immutable atom data. Atoms are only created
//! through an `AtomPool`, which maps the canonical `rel(a1,...,an)` key to a
//! single instance, so atoms from the same pool compare by pointer first.
//!
//! Pools are owned by whoever runs a compilation job; two jobs never share one.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AtomData {
    relation: String,
    args: Vec<String>,
}

/// A relation applied to an ordered argument list (free variables or ground
/// constants). The zero atom has an empty relation and no arguments and sorts
/// before every other atom.
#[derive(Clone)]
pub struct Atom(Arc<AtomData>);

impl Atom {
    pub fn relation(&self) -> &str {
        &self.0.relation
    }

    pub fn args(&self) -> &[String] {
        &self.0.args
    }

    pub fn arity(&self) -> usize {
        self.0.args.len()
    }

    /// True for the zero atom used to carry numeric constants.
    pub fn is_zero(&self) -> bool {
        self.0.relation.is_empty() && self.0.args.is_empty()
    }

    /// Canonical `rel(a1,...,an)` key.
    pub fn key(&self) -> String {
        atom_key(&self.0.relation, &self.0.args)
    }

    /// True if both handles point at the same pooled instance.
    pub fn same_instance(&self, other: &Atom) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Render this atom with every argument replaced through `subst`.
    ///
    /// Returns the first argument `subst` has no answer for.
    pub fn substituted_key<'a, F>(&'a self, mut subst: F) -> Result<String, &'a str>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut out = String::with_capacity(self.0.relation.len() + 2 + 8 * self.arity());
        out.push_str(&self.0.relation);
        out.push('(');
        for (i, arg) in self.0.args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(subst(arg).ok_or(arg.as_str())?);
        }
        out.push(')');
        Ok(out)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.0 == other.0
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    // The zero atom has the empty relation and no args, so the derived
    // (relation, args) order already puts it first.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.same_instance(other) {
            return Ordering::Equal;
        }
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self.key())
    }
}

/// Canonical-string key for an atom.
pub fn atom_key(relation: &str, args: &[String]) -> String {
    let mut key = String::with_capacity(relation.len() + 2);
    key.push_str(relation);
    key.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(arg);
    }
    key.push(')');
    key
}

/// Interning table for atoms, in first-interned order.
#[derive(Debug)]
pub struct AtomPool {
    atoms: IndexMap<String, Atom>,
}

impl AtomPool {
    /// Create a pool holding only the zero atom.
    pub fn new() -> Self {
        let mut pool = Self {
            atoms: IndexMap::new(),
        };
        pool.intern("", Vec::new());
        pool
    }

    /// Return the pooled atom for `(relation, args)`, creating it on first use.
    pub fn intern(&mut self, relation: &str, args: Vec<String>) -> Atom {
        let key = atom_key(relation, &args);
        self.atoms
            .entry(key)
            .or_insert_with(|| {
                Atom(Arc::new(AtomData {
                    relation: relation.to_string(),
                    args,
                }))
            })
            .clone()
    }

    /// The zero atom.
    pub fn zero(&self) -> Atom {
        // `new` interns the zero atom first, and entries are never removed.
        self.atoms[0].clone()
    }

    /// Look up an atom by its canonical key without creating it.
    pub fn get(&self, key: &str) -> Option<&Atom> {
        self.atoms.get(key)
    }

    /// Number of pooled atoms, including the zero atom.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterate over pooled atoms in first-interned order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.atoms.values()
    }
}

impl Default for AtomPool {
    fn default() -> Self {
        Self::new()
    }
}
