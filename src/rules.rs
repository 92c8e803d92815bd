//! Reader for universally quantified constraint files
//!
//! One constraint per line in the constraint grammar. Lines starting with
//! `##` are comments. A line that fails to parse is logged and skipped; a
//! constraint structurally equal to one already read is dropped.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::algebra::{AtomPool, Constraint};
use crate::error::{ParseError, RuleFileError};
use crate::parser::parse_constraint;

/// A line that was skipped because it did not parse.
#[derive(Debug, Clone)]
pub struct RejectedLine {
    /// 1-based
    pub line_no: usize,
    pub error: ParseError,
}

/// Result of reading a rule file.
#[derive(Debug, Default)]
pub struct RuleSet {
    pub constraints: Vec<Constraint>,
    pub duplicates: usize,
    pub rejected: Vec<RejectedLine>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Parse constraint lines from `text`.
pub fn read_rules_str(text: &str, pool: &mut AtomPool) -> RuleSet {
    let mut rules = RuleSet::default();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("##") {
            continue;
        }
        match parse_constraint(line, pool) {
            Ok(c) if rules.constraints.contains(&c) => rules.duplicates += 1,
            Ok(c) => rules.constraints.push(c),
            Err(error) => {
                warn!(line = idx + 1, "skipping constraint: {}", error.message());
                rules.rejected.push(RejectedLine {
                    line_no: idx + 1,
                    error,
                });
            }
        }
    }
    rules
}

/// Read and parse a constraint file. Only failing to read the file is an error.
pub fn read_rules_file(path: impl AsRef<Path>, pool: &mut AtomPool) -> Result<RuleSet, RuleFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| RuleFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = read_rules_str(&text, pool);
    debug!(
        path = %path.display(),
        constraints = rules.len(),
        duplicates = rules.duplicates,
        rejected = rules.rejected.len(),
        "read constraint file"
    );
    Ok(rules)
}
