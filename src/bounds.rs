//! Fixed-value bounds on ground atoms
//!
//! A bound pins one ground atom's value from below or above when the problem
//! is handed to the external solver, e.g. `function(g1,ec_1)=0.4:upper`.
//! Bounds are resolved to ground-atom IDs through the grounding table; they do
//! not change the emitted SDP file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GroundError;
use crate::ground::GroundAtomTable;
use crate::id::GroundAtomId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Lower,
    Upper,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Lower => write!(f, "lower"),
            BoundKind::Upper => write!(f, "upper"),
        }
    }
}

/// A bound as written by the user, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundSpec {
    /// Canonical ground-atom text, whitespace removed
    pub atom: String,
    pub value: f64,
    pub kind: BoundKind,
}

impl FromStr for BoundSpec {
    type Err = String;

    /// `ATOM=VALUE:lower|upper`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (atom, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ATOM=VALUE:lower|upper, got `{}`", s))?;
        let (value, kind) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("missing `:lower` or `:upper` in `{}`", s))?;
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid bound value `{}`: {}", value.trim(), e))?;
        let kind = match kind.trim() {
            "lower" => BoundKind::Lower,
            "upper" => BoundKind::Upper,
            other => return Err(format!("bound type must be lower or upper, got `{}`", other)),
        };
        let atom: String = atom.chars().filter(|c| !c.is_whitespace()).collect();
        if atom.is_empty() {
            return Err(format!("missing atom in `{}`", s));
        }
        Ok(Self { atom, value, kind })
    }
}

/// A bound on a resolved ground atom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundConstraint {
    pub atom: GroundAtomId,
    pub value: f64,
    pub kind: BoundKind,
}

impl BoundSpec {
    /// Look the atom up in `table`.
    pub fn resolve(&self, table: &GroundAtomTable) -> Result<BoundConstraint, GroundError> {
        let atom = table
            .lookup(&self.atom)
            .ok_or_else(|| GroundError::UnknownGroundAtom(self.atom.clone()))?;
        Ok(BoundConstraint {
            atom,
            value: self.value,
            kind: self.kind,
        })
    }
}

/// Resolve every bound, failing on the first unknown atom.
pub fn resolve_all(
    specs: &[BoundSpec],
    table: &GroundAtomTable,
) -> Result<Vec<BoundConstraint>, GroundError> {
    specs.iter().map(|s| s.resolve(table)).collect()
}
