//! ID types for kbsdp
//!
//! Different stages of the pipeline address things at different granularities:
//! - Atom handles for symbolic atoms (shared, hash-consed, see `algebra::atom`)
//! - Ground-atom IDs for fully substituted atoms (dense, first-seen order)
//! - SDP variable numbers for distinct monomials in the emitted problem

/// Dense index of a ground atom in a `GroundAtomTable` (0..N-1).
/// This is the numeric variable index the optimization layer works with.
pub type GroundAtomId = usize;

/// Numeric variable index used inside a `MonomialKey`.
///
/// Upstream term expansion produces these from ground-atom IDs; the encoder
/// treats them as opaque.
pub type VarIndex = u32;

/// Exponent of a variable or atom inside a monomial.
pub type Exponent = u32;

/// SDP scalar variable number (1..=mDim, SDPA convention).
pub type SdpVar = usize;

/// Position of an SDP block (1-indexed, SDPA convention).
pub type BlockId = usize;
