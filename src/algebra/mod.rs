//! Symbolic polynomial algebra over relational atoms
//!
//! - `atom`: hash-consed atoms and the per-job `AtomPool`
//! - `monomial`: canonical products of atoms
//! - `polynomial`: sorted coefficient maps
//! - `constraint`: `poly = 0` / `poly >= 0` with `!=` guards

pub mod atom;
pub mod constraint;
pub mod monomial;
pub mod polynomial;

pub use atom::{atom_key, Atom, AtomPool};
pub use constraint::{Comparison, Constraint};
pub use monomial::Monomial;
pub use polynomial::Polynomial;
