//! Ground-atom table: canonical ground-atom text ↔ dense integer ID
//!
//! IDs are handed out in first-seen order starting at 0, and are the numeric
//! variable indices the optimization layer works with. The table grows for the
//! lifetime of one grounding+encoding job; once downstream consumers have
//! captured the assignment (see `save`) it can be `clear`ed.
//!
//! Keys are the full canonical strings, so two distinct atoms can never share
//! an ID.

use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::id::GroundAtomId;

/// Bidirectional ground-atom ↔ ID map.
///
/// - `intern(text)` → ID (get or create)
/// - `get(id)` → text
/// - `lookup(text)` → Option<ID>
#[derive(Debug, Default, Clone)]
pub struct GroundAtomTable {
    index: IndexSet<String>,
}

/// On-disk form: atoms listed in ID order.
#[derive(Serialize, Deserialize)]
struct TableData {
    atoms: Vec<String>,
}

impl GroundAtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the ID of a ground atom.
    pub fn intern(&mut self, atom: String) -> GroundAtomId {
        let (id, _) = self.index.insert_full(atom);
        id
    }

    /// Canonical text of the ground atom with this ID.
    pub fn get(&self, id: GroundAtomId) -> Option<&str> {
        self.index.get_index(id).map(String::as_str)
    }

    /// ID of an already interned ground atom.
    pub fn lookup(&self, atom: &str) -> Option<GroundAtomId> {
        self.index.get_index_of(atom)
    }

    pub fn contains(&self, atom: &str) -> bool {
        self.index.contains(atom)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over (ID, atom) pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (GroundAtomId, &str)> + '_ {
        self.index.iter().map(String::as_str).enumerate()
    }

    /// Drop every assignment. IDs start again from 0.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// Write the assignment as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let data = TableData {
            atoms: self.index.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&data).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| TableError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read an assignment written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data: TableData = serde_json::from_str(&text).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            index: data.atoms.into_iter().collect(),
        })
    }
}
