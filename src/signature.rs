//! Symbol categories, the predicate-signature table, and the ground-name universe
//!
//! Every ground constant belongs to exactly one `Category`. The signature table
//! says which category each argument position of a relation expects; it is
//! filled once (from defaults or config) and only read afterwards.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::SignatureError;

/// Ground category of a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Gene,
    Enzyme,
    Reaction,
    Compound,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Gene,
        Category::Enzyme,
        Category::Reaction,
        Category::Compound,
    ];

    /// Variable-name prefix used by the name-prefix inference convention.
    pub fn name_prefix(self) -> &'static str {
        match self {
            Category::Gene => "gene",
            Category::Enzyme => "enzyme",
            Category::Reaction => "reaction",
            Category::Compound => "compound",
        }
    }

    /// Category whose prefix starts `name`, if any.
    pub fn from_name_prefix(name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| name.starts_with(c.name_prefix()))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Gene => "GENE",
            Category::Enzyme => "ENZYME",
            Category::Reaction => "REACTION",
            Category::Compound => "COMPOUND",
        };
        write!(f, "{}", s)
    }
}

/// Relation name → ordered argument categories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateSignatures {
    table: BTreeMap<String, Vec<Category>>,
}

impl PredicateSignatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// The metabolic-pathway knowledge base's relations.
    pub fn pathway_defaults() -> Self {
        use Category::*;
        let mut sigs = Self::new();
        sigs.insert("function", vec![Gene, Enzyme]);
        sigs.insert("ortholog", vec![Gene, Gene]);
        sigs.insert("reaction_enzyme", vec![Reaction, Enzyme]);
        sigs.insert(
            "reaction_compound_reaction",
            vec![Reaction, Compound, Reaction],
        );
        sigs.insert("accept_compound", vec![Compound]);
        sigs.insert("reaction", vec![Reaction, Compound, Reaction]);
        sigs.insert(
            "enzyme_reaction_path",
            vec![Gene, Enzyme, Reaction, Reaction, Enzyme, Gene],
        );
        sigs.insert("ortholog_support", vec![Gene, Gene, Enzyme]);
        sigs
    }

    pub fn insert(&mut self, relation: impl Into<String>, args: Vec<Category>) {
        self.table.insert(relation.into(), args);
    }

    pub fn get(&self, relation: &str) -> Option<&[Category]> {
        self.table.get(relation).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up `relation` and check that `arity` matches its signature.
    pub fn check(&self, relation: &str, arity: usize) -> Result<&[Category], SignatureError> {
        let sig = self
            .get(relation)
            .ok_or_else(|| SignatureError::UnknownPredicate(relation.to_string()))?;
        if sig.len() != arity {
            return Err(SignatureError::ArityMismatch {
                name: relation.to_string(),
                expected: sig.len(),
                got: arity,
            });
        }
        Ok(sig)
    }
}

/// Known ground constants per category, in first-registered order.
///
/// The order is what makes grounding enumeration reproducible.
#[derive(Clone, Debug, Default)]
pub struct GroundNames {
    by_category: [IndexSet<String>; 4],
}

impl GroundNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under `category`. Returns true if it was new.
    pub fn insert(&mut self, category: Category, name: impl Into<String>) -> bool {
        self.by_category[category.index()].insert(name.into())
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.by_category[category.index()].contains(name)
    }

    /// Candidate names for `category`.
    pub fn names(&self, category: Category) -> &IndexSet<String> {
        &self.by_category[category.index()]
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category[category.index()].len()
    }

    pub fn total(&self) -> usize {
        self.by_category.iter().map(IndexSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_inference() {
        assert_eq!(Category::from_name_prefix("gene2"), Some(Category::Gene));
        assert_eq!(Category::from_name_prefix("enzymeA"), Some(Category::Enzyme));
        assert_eq!(Category::from_name_prefix("x"), None);
    }

    #[test]
    fn check_reports_arity() {
        let sigs = PredicateSignatures::pathway_defaults();
        assert!(sigs.check("function", 2).is_ok());
        assert_eq!(
            sigs.check("function", 3),
            Err(SignatureError::ArityMismatch {
                name: "function".into(),
                expected: 2,
                got: 3
            })
        );
        assert_eq!(
            sigs.check("nope", 1),
            Err(SignatureError::UnknownPredicate("nope".into()))
        );
    }

    #[test]
    fn ground_names_keep_insertion_order() {
        let mut names = GroundNames::new();
        assert!(names.insert(Category::Gene, "g2"));
        assert!(names.insert(Category::Gene, "g1"));
        assert!(!names.insert(Category::Gene, "g2"));
        let genes: Vec<_> = names.names(Category::Gene).iter().cloned().collect();
        assert_eq!(genes, vec!["g2", "g1"]);
        assert_eq!(names.total(), 2);
    }
}
