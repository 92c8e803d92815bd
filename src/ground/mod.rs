//! Grounding engine
//!
//! Instantiates universally quantified constraints over the finite, typed
//! ground-name universe. For each constraint:
//!
//! 1. find its free variables and their categories (`vars`)
//! 2. enumerate every assignment of candidate names to variables, with
//!    repetition, in a fixed order (`Assignments`)
//! 3. substitute into every atom, intern the resulting ground atoms in the
//!    shared `GroundAtomTable`, and record the ID vector
//!
//! The per-constraint ID vectors are then packed into `GroundingBuffers`.
//!
//! Distinctness guards (`x != y :`) are only applied when
//! `GuardMode::Enforce` is selected. The bulk path has historically ignored
//! them, and that remains the default.

pub mod buffers;
pub mod table;
pub mod vars;

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algebra::{Comparison, Constraint};
use crate::error::GroundError;
use crate::id::GroundAtomId;
use crate::signature::{GroundNames, PredicateSignatures};

pub use buffers::GroundingBuffers;
pub use table::GroundAtomTable;
pub use vars::{
    category_counts, constant_hint, instantiation_count, ordered_typed_vars, ConstantHint, TypedVar,
};

/// Where a free variable's category comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryInference {
    /// The predicate-signature table, per argument position
    #[default]
    Signature,
    /// The variable's name prefix (`gene…`, `enzyme…`, `reaction…`, `compound…`)
    NamePrefix,
}

/// Whether bulk grounding evaluates distinctness guards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardMode {
    #[default]
    Ignore,
    Enforce,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroundingOptions {
    pub inference: CategoryInference,
    pub guards: GuardMode,
}

// ============================================================================
// Enumeration
// ============================================================================

/// Every assignment of candidate names to a constraint's free variables.
///
/// Variables are grouped by category (categories in first-appearance order);
/// within a category the k-th variable takes the k-th slot. The last slot
/// varies fastest, so the sequence is a depth-first walk over categories and,
/// within each, over candidate names. Yields values aligned with the `vars`
/// slice it was built from. With no variables it yields one empty assignment;
/// with an empty candidate pool it yields nothing.
pub struct Assignments<'a> {
    slots: Vec<(usize, &'a IndexSet<String>)>,
    cursor: Vec<usize>,
    var_count: usize,
    done: bool,
}

impl<'a> Assignments<'a> {
    pub fn new(vars: &[TypedVar], names: &'a GroundNames) -> Self {
        let mut slots = Vec::with_capacity(vars.len());
        for (category, _) in category_counts(vars) {
            for (i, _) in vars.iter().enumerate().filter(|(_, v)| v.category == category) {
                slots.push((i, names.names(category)));
            }
        }
        let done = slots.iter().any(|(_, pool)| pool.is_empty());
        Self {
            cursor: vec![0; slots.len()],
            slots,
            var_count: vars.len(),
            done,
        }
    }
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut values = vec![""; self.var_count];
        for (&(var, pool), &pos) in self.slots.iter().zip(&self.cursor) {
            values[var] = pool[pos].as_str();
        }

        self.done = true;
        for k in (0..self.slots.len()).rev() {
            self.cursor[k] += 1;
            if self.cursor[k] < self.slots[k].1.len() {
                self.done = false;
                break;
            }
            self.cursor[k] = 0;
        }
        Some(values)
    }
}

// ============================================================================
// Substitution
// ============================================================================

/// Free variable → constant, plus the constraint's own ground constants
/// mapped to themselves.
#[derive(Debug, Default)]
pub struct Substitution<'a> {
    map: HashMap<&'a str, &'a str>,
}

impl<'a> Substitution<'a> {
    pub fn new(vars: &'a [TypedVar], values: &[&'a str], constants: &[&'a str]) -> Self {
        let mut map = HashMap::with_capacity(vars.len() + constants.len());
        for c in constants {
            map.insert(*c, *c);
        }
        for (var, value) in vars.iter().zip(values) {
            map.insert(var.name.as_str(), *value);
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.map.get(name).copied()
    }
}

/// Arguments of `constraint` that are not free variables.
fn ground_constants<'c>(constraint: &'c Constraint, vars: &[TypedVar]) -> Vec<&'c str> {
    constraint
        .argument_names()
        .into_iter()
        .filter(|a| !vars.iter().any(|v| v.name == *a))
        .collect()
}

/// Ground-atom IDs touched by one substitution: one per atom item of every
/// non-constant term, in term order.
fn atom_ids(
    constraint: &Constraint,
    subst: &Substitution<'_>,
    table: &mut GroundAtomTable,
) -> Result<Vec<GroundAtomId>, GroundError> {
    let mut ids = Vec::new();
    for (mono, _) in constraint.poly.terms() {
        if mono.is_constant() {
            continue;
        }
        for atom in mono.atoms() {
            let key = atom
                .substituted_key(|arg| subst.get(arg))
                .map_err(|missing| GroundError::MissingSubstitution(missing.to_string()))?;
            ids.push(table.intern(key));
        }
    }
    Ok(ids)
}

/// One constraint grounded by an explicit substitution.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundedConstraint {
    pub atom_ids: Vec<GroundAtomId>,
    /// The ground polynomial with each ground atom written `x<id>`
    pub rendered: String,
}

impl Constraint {
    /// Ground this constraint with `values` assigned to `vars` in order.
    ///
    /// Returns `Ok(None)` when a distinctness guard is violated.
    pub fn ground_with(
        &self,
        vars: &[TypedVar],
        values: &[&str],
        table: &mut GroundAtomTable,
    ) -> Result<Option<GroundedConstraint>, GroundError> {
        if vars.len() != values.len() {
            return Err(GroundError::CardinalityMismatch {
                expected: vars.len(),
                got: values.len(),
            });
        }
        let constants = ground_constants(self, vars);
        let subst = Substitution::new(vars, values, &constants);
        if !self.guards_hold(|v| subst.get(v)) {
            return Ok(None);
        }

        let mut atom_ids = Vec::new();
        let mut rendered = String::new();
        for (i, (mono, coef)) in self.poly.terms().iter().enumerate() {
            match (i, *coef < 0.0) {
                (0, false) => {}
                (0, true) => rendered.push('-'),
                (_, false) => rendered.push_str(" + "),
                (_, true) => rendered.push_str(" - "),
            }
            let magnitude = coef.abs();
            if mono.is_constant() {
                rendered.push_str(&magnitude.to_string());
                continue;
            }
            if magnitude != 1.0 {
                rendered.push_str(&format!("{}*", magnitude));
            }
            for (j, (atom, exp)) in mono.items().iter().enumerate() {
                let key = atom
                    .substituted_key(|arg| subst.get(arg))
                    .map_err(|missing| GroundError::MissingSubstitution(missing.to_string()))?;
                let id = table.intern(key);
                atom_ids.push(id);
                if j > 0 {
                    rendered.push('*');
                }
                rendered.push_str(&format!("x{}", id));
                if *exp > 1 {
                    rendered.push_str(&format!("^{}", exp));
                }
            }
        }
        if rendered.is_empty() {
            rendered.push('0');
        }
        rendered.push_str(match self.cmp {
            Comparison::GeZero => " >= 0",
            Comparison::EqZero => " = 0",
        });

        Ok(Some(GroundedConstraint { atom_ids, rendered }))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// All instantiations of one constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintGrounding {
    pub vars: Vec<TypedVar>,
    /// One ground-atom ID vector per instantiation, in enumeration order
    pub instantiations: Vec<Vec<GroundAtomId>>,
    /// Instantiations dropped by enforced guards
    pub guard_rejected: usize,
}

/// Grounds constraints against a fixed signature table and name universe,
/// sharing one ground-atom table across all of them.
pub struct GroundingEngine<'a> {
    signatures: &'a PredicateSignatures,
    names: &'a GroundNames,
    options: GroundingOptions,
    table: GroundAtomTable,
}

impl<'a> GroundingEngine<'a> {
    pub fn new(
        signatures: &'a PredicateSignatures,
        names: &'a GroundNames,
        options: GroundingOptions,
    ) -> Self {
        Self {
            signatures,
            names,
            options,
            table: GroundAtomTable::new(),
        }
    }

    pub fn options(&self) -> GroundingOptions {
        self.options
    }

    pub fn table(&self) -> &GroundAtomTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut GroundAtomTable {
        &mut self.table
    }

    /// Hand over the ground-atom table, leaving an empty one behind.
    pub fn take_table(&mut self) -> GroundAtomTable {
        std::mem::take(&mut self.table)
    }

    /// Free variables of `constraint` under this engine's inference mode.
    pub fn typed_vars(&self, constraint: &Constraint) -> Result<Vec<TypedVar>, GroundError> {
        ordered_typed_vars(constraint, self.signatures, self.names, self.options.inference)
    }

    /// Enumerate and ground every instantiation of one constraint.
    pub fn ground_constraint(
        &mut self,
        constraint: &Constraint,
    ) -> Result<ConstraintGrounding, GroundError> {
        let vars = self.typed_vars(constraint)?;
        let constants = ground_constants(constraint, &vars);
        let enforce = self.options.guards == GuardMode::Enforce && !constraint.guards.is_empty();

        let mut grounding = ConstraintGrounding::default();
        for values in Assignments::new(&vars, self.names) {
            let subst = Substitution::new(&vars, &values, &constants);
            if enforce && !constraint.guards_hold(|v| subst.get(v)) {
                grounding.guard_rejected += 1;
                continue;
            }
            grounding
                .instantiations
                .push(atom_ids(constraint, &subst, &mut self.table)?);
        }
        grounding.vars = vars;
        Ok(grounding)
    }

    /// Ground every constraint in order.
    ///
    /// A constraint that cannot be grounded (unknown category, signature
    /// violation) is logged and contributes an `Err` in its slot, so result
    /// positions stay aligned with the input.
    pub fn ground_all(
        &mut self,
        constraints: &[Constraint],
    ) -> Vec<Result<ConstraintGrounding, GroundError>> {
        if self.options.guards == GuardMode::Ignore && constraints.iter().any(|c| !c.guards.is_empty()) {
            warn!("distinctness guards are present but not applied (grounding.guards = ignore)");
        }

        constraints
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let result = self.ground_constraint(c);
                match &result {
                    Ok(g) => debug!(
                        constraint = i,
                        vars = g.vars.len(),
                        instantiations = g.instantiations.len(),
                        guard_rejected = g.guard_rejected,
                        table = self.table.len(),
                        "grounded constraint"
                    ),
                    Err(e) => warn!(constraint = i, "skipping constraint `{}`: {}", c, e),
                }
                result
            })
            .collect()
    }
}

/// Instantiation lists for packing, with failed constraints left empty.
pub fn instantiation_lists(
    results: &[Result<ConstraintGrounding, GroundError>],
) -> Vec<Vec<Vec<GroundAtomId>>> {
    results
        .iter()
        .map(|r| match r {
            Ok(g) => g.instantiations.clone(),
            Err(_) => Vec::new(),
        })
        .collect()
}
