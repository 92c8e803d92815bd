//! Free variables of a constraint and their categories

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::algebra::Constraint;
use crate::error::GroundError;
use crate::ground::CategoryInference;
use crate::signature::{Category, GroundNames, PredicateSignatures};

/// A free variable together with the category it ranges over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedVar {
    pub name: String,
    pub category: Category,
}

/// Distinct free variables of `constraint` in first-occurrence order (terms
/// in canonical order, atoms left to right, arguments left to right).
///
/// With `CategoryInference::Signature`, each argument position takes its
/// category from the predicate-signature table; an argument already known as
/// a ground name of that category is a constant, anything else is a variable,
/// and a variable seen at positions of two different categories is rejected.
/// An unknown constant therefore ranges over its whole category; new
/// variables that look like constants are logged (see `constant_hint`).
///
/// With `CategoryInference::NamePrefix`, every argument is a variable whose
/// category comes from its name prefix (`gene…`, `enzyme…`, ...).
pub fn ordered_typed_vars(
    constraint: &Constraint,
    signatures: &PredicateSignatures,
    names: &GroundNames,
    inference: CategoryInference,
) -> Result<Vec<TypedVar>, GroundError> {
    let mut seen: IndexMap<&str, Category> = IndexMap::new();

    for atom in constraint.atoms() {
        match inference {
            CategoryInference::Signature => {
                let categories = signatures.check(atom.relation(), atom.arity())?;
                for (arg, &category) in atom.args().iter().zip(categories) {
                    if names.contains(category, arg) {
                        continue;
                    }
                    match seen.get(arg.as_str()) {
                        Some(&first) if first != category => {
                            return Err(GroundError::ConflictingCategory {
                                var: arg.clone(),
                                first,
                                second: category,
                            });
                        }
                        Some(_) => {}
                        None => {
                            match constant_hint(arg, category, names) {
                                Some(ConstantHint::OtherCategory(known)) => warn!(
                                    var = %arg,
                                    category = %category,
                                    known_as = %known,
                                    "argument is a ground name of another category; grounding it as a variable"
                                ),
                                Some(ConstantHint::HasDigit) => debug!(
                                    var = %arg,
                                    category = %category,
                                    "argument is not a known ground name; grounding it as a variable"
                                ),
                                None => {}
                            }
                            seen.insert(arg.as_str(), category);
                        }
                    }
                }
            }
            CategoryInference::NamePrefix => {
                for arg in atom.args() {
                    if seen.contains_key(arg.as_str()) {
                        continue;
                    }
                    let category = Category::from_name_prefix(arg)
                        .ok_or_else(|| GroundError::UnknownCategory(arg.clone()))?;
                    seen.insert(arg.as_str(), category);
                }
            }
        }
    }

    Ok(seen
        .into_iter()
        .map(|(name, category)| TypedVar {
            name: name.to_string(),
            category,
        })
        .collect())
}

/// Why a name taken as a variable may have been meant as a constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstantHint {
    /// Known as a ground name, but of a different category
    OtherCategory(Category),
    /// Contains a digit, like most constant names (`g1`, `ec_1`)
    HasDigit,
}

/// Check a would-be variable `arg` at a position of `category`.
pub fn constant_hint(arg: &str, category: Category, names: &GroundNames) -> Option<ConstantHint> {
    if let Some(&known) = Category::ALL
        .iter()
        .find(|&&c| c != category && names.contains(c, arg))
    {
        return Some(ConstantHint::OtherCategory(known));
    }
    arg.chars()
        .any(|c| c.is_ascii_digit())
        .then_some(ConstantHint::HasDigit)
}

/// How many variables of each category, categories in first-appearance order.
pub fn category_counts(vars: &[TypedVar]) -> Vec<(Category, usize)> {
    let mut counts: IndexMap<Category, usize> = IndexMap::new();
    for var in vars {
        *counts.entry(var.category).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Number of instantiations the enumeration produces: `∏ n_c ^ k_c`.
pub fn instantiation_count(vars: &[TypedVar], names: &GroundNames) -> u128 {
    category_counts(vars)
        .into_iter()
        .map(|(c, k)| (names.count(c) as u128).saturating_pow(k as u32))
        .fold(1u128, u128::saturating_mul)
}
