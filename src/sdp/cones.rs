//! Cone descriptions and their block/entry rules
//!
//! Every rule is written once and driven through both passes by the
//! `StreamingContext`, so the counting walk and the writing walk visit the
//! same monomials, blocks and positions in the same order. Rows, columns and
//! blocks are 1-based.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EncodeError;
use crate::sdp::context::StreamingContext;
use crate::sdp::key::MonomialKey;

/// One objective term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTerm {
    pub mono: MonomialKey,
    pub coef: f64,
}

/// A support monomial with one coefficient per scalar sub-constraint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarTerm {
    pub mono: MonomialKey,
    /// `coefs[s]` for sub-constraint `s`; length equals the cone size
    pub coefs: Vec<f64>,
}

/// One entry of a symmetric `size × size` coefficient matrix, upper triangle
/// (`row <= col`), 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// A support monomial with its coefficient matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixTerm {
    pub mono: MonomialKey,
    pub entries: Vec<MatrixEntry>,
}

/// One constraint cone of the polynomial problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Cone {
    /// `size` polynomial equalities multiplied by each basis monomial
    Equality {
        size: usize,
        terms: Vec<ScalarTerm>,
        basis: Vec<MonomialKey>,
    },
    /// `size` polynomial inequalities with a localizing basis
    Inequality {
        size: usize,
        terms: Vec<ScalarTerm>,
        basis: Vec<MonomialKey>,
    },
    /// A polynomial matrix inequality of dimension `size`
    Sdp {
        size: usize,
        terms: Vec<MatrixTerm>,
        basis: Vec<MonomialKey>,
    },
    /// A pure moment matrix over `basis`
    Moment { basis: Vec<MonomialKey> },
}

impl Cone {
    pub fn basis(&self) -> &[MonomialKey] {
        match self {
            Cone::Equality { basis, .. }
            | Cone::Inequality { basis, .. }
            | Cone::Sdp { basis, .. }
            | Cone::Moment { basis } => basis,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Cone::Equality { .. } => "equality",
            Cone::Inequality { .. } => "inequality",
            Cone::Sdp { .. } => "sdp",
            Cone::Moment { .. } => "moment",
        }
    }

    /// Check sizes and matrix coordinates.
    ///
    /// Block dimensions (`2·size·bsize` for equalities, `size·bsize`
    /// otherwise) must fit the signed block-structure line.
    pub fn validate(&self, index: usize) -> Result<(), EncodeError> {
        let invalid = |reason: String| EncodeError::InvalidCone { index, reason };
        match self {
            Cone::Equality { size, terms, basis } | Cone::Inequality { size, terms, basis } => {
                if *size == 0 {
                    return Err(invalid("cone size must be at least 1".into()));
                }
                if let Some(t) = terms.iter().find(|t| t.coefs.len() != *size) {
                    return Err(invalid(format!(
                        "term {} has {} coefficients, cone size is {}",
                        t.mono,
                        t.coefs.len(),
                        size
                    )));
                }
                let dim = match self {
                    Cone::Equality { .. } => size
                        .checked_mul(basis.len())
                        .and_then(|n| n.checked_mul(2)),
                    _ => size.checked_mul(basis.len().max(1)),
                };
                check_block_dim(dim, *size, basis.len()).map_err(invalid)?;
            }
            Cone::Sdp { size, terms, basis } => {
                if *size == 0 {
                    return Err(invalid("cone size must be at least 1".into()));
                }
                check_block_dim(size.checked_mul(basis.len()), *size, basis.len())
                    .map_err(invalid)?;
                for t in terms {
                    if let Some(e) = t.entries.iter().find(|e| e.row > e.col || e.col >= *size) {
                        return Err(invalid(format!(
                            "entry ({}, {}) of term {} is outside the upper triangle of a {}x{} matrix",
                            e.row, e.col, t.mono, size, size
                        )));
                    }
                }
            }
            Cone::Moment { basis } => {
                check_block_dim(Some(basis.len()), 1, basis.len()).map_err(invalid)?;
            }
        }
        Ok(())
    }
}

fn check_block_dim(dim: Option<usize>, size: usize, bsize: usize) -> Result<(), String> {
    match dim {
        Some(n) if i64::try_from(n).is_ok() => Ok(()),
        _ => Err(format!(
            "block for size {} with {} basis monomials is too large",
            size, bsize
        )),
    }
}

/// A complete problem: objective plus ordered cones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SdpProblem {
    #[serde(default)]
    pub objective: Vec<ObjectiveTerm>,
    #[serde(default)]
    pub cones: Vec<Cone>,
}

// ============================================================================
// Walks
// ============================================================================

pub(crate) fn walk_objective<W: Write>(
    ctx: &mut StreamingContext<W>,
    objective: &[ObjectiveTerm],
) -> Result<(), EncodeError> {
    for term in objective {
        if !ctx.is_significant(term.coef) {
            continue;
        }
        if ctx.is_counting() {
            ctx.register_monomial(term.mono.clone());
        } else {
            ctx.add_objective(&term.mono, term.coef)?;
        }
    }
    Ok(())
}

/// Dispatch one cone to its rule. Cones with an empty basis contribute
/// nothing.
pub(crate) fn walk_cone<W: Write>(
    ctx: &mut StreamingContext<W>,
    index: usize,
    cone: &Cone,
) -> Result<(), EncodeError> {
    let basis = cone.basis();
    if basis.is_empty() {
        if ctx.is_counting() {
            debug!(cone = index, kind = cone.kind_name(), "skipping cone with empty basis");
        }
        return Ok(());
    }

    let before = ctx.m_dim();
    match cone {
        Cone::Equality { size, terms, .. } => equality(ctx, *size, terms, basis)?,
        Cone::Inequality { size, terms, .. } if basis.len() == 1 => {
            inequality_diagonal(ctx, *size, terms, &basis[0])?
        }
        Cone::Inequality { size, terms, .. } => inequality_full(ctx, *size, terms, basis)?,
        Cone::Sdp { size, terms, .. } => sdp(ctx, *size, terms, basis)?,
        Cone::Moment { .. } if basis.len() == 1 => moment_single(ctx, &basis[0])?,
        Cone::Moment { .. } => moment_full(ctx, basis)?,
    }
    if ctx.is_counting() {
        debug!(
            cone = index,
            kind = cone.kind_name(),
            basis = basis.len(),
            added = ctx.m_dim() - before,
            "counted cone"
        );
    }
    Ok(())
}

/// Diagonal block of size `2·size·bsize`: `+c` at `j+1+s`, then `-c` at the
/// same position shifted by `bsize+size-1`.
fn equality<W: Write>(
    ctx: &mut StreamingContext<W>,
    size: usize,
    terms: &[ScalarTerm],
    basis: &[MonomialKey],
) -> Result<(), EncodeError> {
    let bsize = basis.len();
    let shift = bsize + size - 1;
    let block = ctx.start_block(-2 * (size * bsize) as i64);

    for (sign, offset) in [(1.0, 0), (-1.0, shift)] {
        // Both sweeps touch the same monomials
        if offset > 0 && ctx.is_counting() {
            break;
        }
        for s in 0..size {
            for (j, b) in basis.iter().enumerate() {
                for t in terms {
                    let c = t.coefs[s];
                    if !ctx.is_significant(c) {
                        continue;
                    }
                    let pos = j + 1 + s + offset;
                    ctx.emit(t.mono.merge(b), block, pos, pos, sign * c)?;
                }
            }
        }
    }
    Ok(())
}

/// Diagonal block of size `size`: `+c` at `s+1`.
fn inequality_diagonal<W: Write>(
    ctx: &mut StreamingContext<W>,
    size: usize,
    terms: &[ScalarTerm],
    basis: &MonomialKey,
) -> Result<(), EncodeError> {
    let block = ctx.start_block(-(size as i64));
    for s in 0..size {
        for t in terms {
            let c = t.coefs[s];
            if ctx.is_significant(c) {
                ctx.emit(t.mono.merge(basis), block, s + 1, s + 1, c)?;
            }
        }
    }
    Ok(())
}

/// One full `bsize` block per sub-constraint: the localizing matrix
/// `c · b_j · b_k · m` at `(j+1, k+1)`, upper triangle.
fn inequality_full<W: Write>(
    ctx: &mut StreamingContext<W>,
    size: usize,
    terms: &[ScalarTerm],
    basis: &[MonomialKey],
) -> Result<(), EncodeError> {
    let bsize = basis.len();
    for s in 0..size {
        let block = ctx.start_block(bsize as i64);
        for j in 0..bsize {
            for k in j..bsize {
                let moment = basis[j].merge(&basis[k]);
                for t in terms {
                    let c = t.coefs[s];
                    if ctx.is_significant(c) {
                        ctx.emit(moment.merge(&t.mono), block, j + 1, k + 1, c)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Full block of size `bsize·size`: the Kronecker layout of moment entry
/// `(j, k)` with each coefficient matrix. Entry `(r, c)` of the coefficient
/// matrix lands at `(r + j·size + 1, c + k·size + 1)`; off the moment
/// diagonal its transpose `(c, r)` is written too.
fn sdp<W: Write>(
    ctx: &mut StreamingContext<W>,
    size: usize,
    terms: &[MatrixTerm],
    basis: &[MonomialKey],
) -> Result<(), EncodeError> {
    let bsize = basis.len();
    let block = ctx.start_block((bsize * size) as i64);
    for j in 0..bsize {
        let row_base = j * size;
        for k in j..bsize {
            let col_base = k * size;
            let moment = basis[j].merge(&basis[k]);
            for t in terms {
                let key = moment.merge(&t.mono);
                for e in &t.entries {
                    if !ctx.is_significant(e.value) {
                        continue;
                    }
                    ctx.emit(
                        key.clone(),
                        block,
                        e.row + row_base + 1,
                        e.col + col_base + 1,
                        e.value,
                    )?;
                    if j != k && e.row != e.col {
                        ctx.emit(
                            key.clone(),
                            block,
                            e.col + row_base + 1,
                            e.row + col_base + 1,
                            e.value,
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// `[-1]` block holding the squared basis monomial. A constant basis
/// monomial contributes nothing.
fn moment_single<W: Write>(
    ctx: &mut StreamingContext<W>,
    basis: &MonomialKey,
) -> Result<(), EncodeError> {
    if basis.is_constant() {
        return Ok(());
    }
    let block = ctx.start_block(-1);
    ctx.emit(basis.squared(), block, 1, 1, 1.0)
}

/// Full `bsize` moment matrix: `1.0` at `(i+1, j+1)` for `b_i · b_j`.
fn moment_full<W: Write>(
    ctx: &mut StreamingContext<W>,
    basis: &[MonomialKey],
) -> Result<(), EncodeError> {
    let bsize = basis.len();
    let block = ctx.start_block(bsize as i64);
    for i in 0..bsize {
        for j in i..bsize {
            ctx.emit(basis[i].merge(&basis[j]), block, i + 1, j + 1, 1.0)?;
        }
    }
    Ok(())
}
