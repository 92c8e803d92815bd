//! Flattened grounding buffers for the solver adapter
//!
//! Per-constraint instantiation vectors are packed into three flat arrays:
//! `widths[i]` atoms per instantiation of entry `i`, `offsets[i]` where entry
//! `i` starts in `data`, and `data` itself. Entry 0 is reserved for the
//! objective (width 0, offset 0), so constraint `k` lives at entry `k + 1`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::id::GroundAtomId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingBuffers {
    pub widths: Vec<usize>,
    pub offsets: Vec<usize>,
    pub data: Vec<GroundAtomId>,
}

impl GroundingBuffers {
    /// Pack per-constraint instantiation lists.
    ///
    /// The width of a constraint is the length of its first instantiation;
    /// a constraint with no instantiations has width 0.
    pub fn from_instantiations(per_constraint: &[Vec<Vec<GroundAtomId>>]) -> Self {
        let mut buffers = Self {
            widths: Vec::with_capacity(per_constraint.len() + 1),
            offsets: Vec::with_capacity(per_constraint.len() + 1),
            data: Vec::new(),
        };
        buffers.widths.push(0);
        buffers.offsets.push(0);

        for instantiations in per_constraint {
            buffers
                .widths
                .push(instantiations.first().map_or(0, Vec::len));
            buffers.offsets.push(buffers.data.len());
            for ids in instantiations {
                buffers.data.extend_from_slice(ids);
            }
        }
        buffers
    }

    /// Number of entries, including the objective slot.
    pub fn entries(&self) -> usize {
        self.widths.len()
    }

    /// Number of instantiations stored for entry `i`.
    pub fn instantiation_count(&self, i: usize) -> usize {
        let Some(&width) = self.widths.get(i) else {
            return 0;
        };
        if width == 0 {
            return 0;
        }
        let end = self.offsets.get(i + 1).copied().unwrap_or(self.data.len());
        (end - self.offsets[i]) / width
    }

    /// Atom IDs of instantiation `j` of entry `i`.
    pub fn instantiation(&self, i: usize, j: usize) -> Option<&[GroundAtomId]> {
        let width = *self.widths.get(i)?;
        if width == 0 || j >= self.instantiation_count(i) {
            return None;
        }
        let start = self.offsets[i] + j * width;
        self.data.get(start..start + width)
    }

    /// Write the buffers as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let json = serde_json::to_string(self).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_slot_comes_first() {
        let per_constraint = vec![
            vec![vec![0, 1], vec![2, 3], vec![0, 3]],
            vec![],
            vec![vec![4]],
        ];
        let b = GroundingBuffers::from_instantiations(&per_constraint);
        assert_eq!(b.widths, vec![0, 2, 0, 1]);
        assert_eq!(b.offsets, vec![0, 0, 6, 6]);
        assert_eq!(b.data, vec![0, 1, 2, 3, 0, 3, 4]);
        assert_eq!(b.instantiation_count(1), 3);
        assert_eq!(b.instantiation(1, 2), Some(&[0, 3][..]));
        assert_eq!(b.instantiation(3, 0), Some(&[4][..]));
        assert_eq!(b.instantiation(2, 0), None);
    }
}
