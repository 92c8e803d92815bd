//! kbsdp: compiles typed polynomial constraints over probabilistic facts
//! into sparse SDPA problems
//!
//! The pipeline runs leaves first:
//! - `algebra`: hash-consed atoms, canonical monomials and polynomials
//! - `parser` (with `lexer`, `ast`, `pretty`): the constraint language
//! - `facts`, `rules`: line-oriented readers for ground facts and rule files
//! - `ground`: instantiates universal constraints over the typed name universe
//! - `sdp`: two-pass streaming encoder from polynomial cones to SDPA

pub mod algebra;
pub mod ast;
pub mod bounds;
pub mod config;
pub mod error;
pub mod facts;
pub mod ground;
pub mod id;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod rules;
pub mod sdp;
pub mod signature;

pub use algebra::{Atom, AtomPool, Comparison, Constraint, Monomial, Polynomial};
pub use config::Config;
pub use error::{Error, Result};
pub use lexer::lexer;
pub use parser::{parse_constraint, parser};
pub use pretty::pretty_print;
pub use signature::{Category, GroundNames, PredicateSignatures};
