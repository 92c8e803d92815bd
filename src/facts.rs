//! Reader for probabilistic ground facts
//!
//! One fact per line: `[prob::]predicate(arg1,...,argN).`, probability
//! defaulting to 1.0. Blank lines and lines starting with `%` are skipped.
//! Each fact is checked against the predicate-signature table, its arguments
//! are registered in the ground-name universe under their declared
//! categories, and it becomes the equality constraint `atom - prob = 0`.
//!
//! Any bad line aborts the whole file; facts are a required input.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::algebra::{AtomPool, Comparison, Constraint, Monomial, Polynomial};
use crate::error::FactError;
use crate::signature::{GroundNames, PredicateSignatures};

/// A fact split into its parts, before any table is touched.
#[derive(Clone, Debug, PartialEq)]
pub struct RawFact {
    pub probability: f64,
    pub relation: String,
    pub args: Vec<String>,
}

/// Split `[prob::]rel(a,b).` into its parts.
pub fn split_fact(line: &str) -> Result<RawFact, FactError> {
    let line = line.trim();
    let (probability, atom_text) = match line.split_once("::") {
        Some((prob, rest)) => {
            let probability = prob.trim().parse::<f64>().map_err(|_| FactError::BadProbability {
                text: prob.trim().to_string(),
                line: line.to_string(),
            })?;
            (probability, rest.trim())
        }
        None => (1.0, line),
    };
    let atom_text = atom_text.strip_suffix('.').unwrap_or(atom_text);

    let open = atom_text
        .find('(')
        .ok_or_else(|| FactError::MissingParen(atom_text.to_string()))?;
    let close = atom_text[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| FactError::UnclosedParen(atom_text.to_string()))?;

    let relation = atom_text[..open].trim().to_string();
    let inner = atom_text[open + 1..close].trim();
    let args = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(|a| a.trim().to_string()).collect()
    };

    Ok(RawFact {
        probability,
        relation,
        args,
    })
}

/// Reads fact lines into equality constraints, filling the ground-name
/// universe as it goes.
pub struct FactReader<'a> {
    signatures: &'a PredicateSignatures,
    names: &'a mut GroundNames,
    pool: &'a mut AtomPool,
}

impl<'a> FactReader<'a> {
    pub fn new(
        signatures: &'a PredicateSignatures,
        names: &'a mut GroundNames,
        pool: &'a mut AtomPool,
    ) -> Self {
        Self {
            signatures,
            names,
            pool,
        }
    }

    /// Parse a single fact line.
    pub fn parse_line(&mut self, line: &str) -> Result<Constraint, FactError> {
        let fact = split_fact(line)?;
        let categories = self
            .signatures
            .check(&fact.relation, fact.args.len())
            .map_err(|source| FactError::Signature {
                line: line.trim().to_string(),
                source,
            })?;

        for (arg, category) in fact.args.iter().zip(categories) {
            self.names.insert(*category, arg.as_str());
        }

        let atom = self.pool.intern(&fact.relation, fact.args);
        let mut poly = Polynomial::new();
        poly.add_term(Monomial::from_atom(atom), 1.0);
        poly.add_term(Monomial::constant(self.pool), -fact.probability);
        Ok(Constraint::new(poly, Comparison::EqZero))
    }

    /// Parse every fact in `text`, stopping at the first bad line.
    pub fn parse_str(&mut self, text: &str) -> Result<Vec<Constraint>, FactError> {
        let mut constraints = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            let constraint = self.parse_line(line).map_err(|e| FactError::AtLine {
                line_no: idx + 1,
                source: Box::new(e),
            })?;
            constraints.push(constraint);
        }
        Ok(constraints)
    }

    /// Read and parse a fact file.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Constraint>, FactError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let constraints = self.parse_str(&text)?;
        debug!(
            path = %path.display(),
            facts = constraints.len(),
            names = self.names.total(),
            "read fact file"
        );
        Ok(constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_defaults_probability_and_strips_dot() {
        let fact = split_fact("accept_compound(c16875).").unwrap();
        assert_eq!(fact.probability, 1.0);
        assert_eq!(fact.relation, "accept_compound");
        assert_eq!(fact.args, vec!["c16875"]);
    }

    #[test]
    fn split_reads_probability_prefix() {
        let fact = split_fact("0.183::function(g614, ec_4_13).").unwrap();
        assert_eq!(fact.probability, 0.183);
        assert_eq!(fact.args, vec!["g614", "ec_4_13"]);
    }

    #[test]
    fn split_rejects_malformed_atoms() {
        assert!(matches!(
            split_fact("0.5::function"),
            Err(FactError::MissingParen(_))
        ));
        assert!(matches!(
            split_fact("function(g1,e1"),
            Err(FactError::UnclosedParen(_))
        ));
        assert!(matches!(
            split_fact("abc::function(g1,e1)"),
            Err(FactError::BadProbability { .. })
        ));
    }
}
