//! Enumeration of all distinct views of a diff
//!
//! Every edited artifact can be hidden by a configuration that contradicts
//! its presence condition. Conjunctions of these negated conditions are the
//! partial configurations worth viewing; two configurations that are
//! equivalent give the same view, and an unsatisfiable one gives no view at
//! all. Subsets are enumerated as bit vectors. Once a subset is found
//! unsatisfiable, none of its supersets is checked again.

use crate::error::ViewError;
use crate::queries::Configure;
use crate::view::optimized_view;
use indexmap::IndexSet;
use std::time::{Duration, Instant};
use vdiff_formula::{Formula, FormulaOracle};
use vdiff_pattern::{classify_all, EditPattern};
use vdiff_tree::{Time, VariationDiff};

/// Clause cap for canonicalizing conditions
pub const MAX_CNF_CLAUSES: usize = 256;

/// Bounds on the number of satisfiability checks during enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationLimits {
    /// Stop after this many checked subsets
    pub max_iterations: Option<u64>,
    /// Stop once this instant has passed
    pub deadline: Option<Instant>,
}

impl EnumerationLimits {
    /// No limits
    #[inline]
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Set the iteration cap
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set the deadline to `budget` from now
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.deadline = Instant::now().checked_add(budget);
        self
    }

    fn exhausted(&self, iterations: u64) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Negated presence condition with its sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Condition {
    formula: Formula,
    clauses: usize,
    literals: usize,
}

impl Condition {
    fn new(negated_pc: &Formula) -> Self {
        match negated_pc.to_regular_cnf(MAX_CNF_CLAUSES) {
            Some(cnf) => Self {
                formula: cnf.to_formula(),
                clauses: cnf.clause_count(),
                literals: cnf.literal_count(),
            },
            None => Self {
                formula: negated_pc.clone(),
                clauses: 1,
                literals: negated_pc.literal_count(),
            },
        }
    }
}

/// Distinct negated presence conditions of all edited artifacts, simplest
/// first
fn deselection_conditions(tree: &VariationDiff, oracle: &dyn FormulaOracle) -> Result<Vec<Condition>, ViewError> {
    let mut conditions: IndexSet<Condition> = IndexSet::new();
    for (artifact, pattern) in classify_all(tree, oracle)? {
        if pattern == EditPattern::Untouched {
            continue;
        }
        let node = tree.node(artifact);
        for time in Time::ALL.into_iter().filter(|t| node.exists_at_time(*t)) {
            let pc = tree.presence_condition(artifact, time)?;
            let negated = pc.eliminate_true_false().negate().eliminate_true_false();
            conditions.insert(Condition::new(&negated));
        }
    }

    let mut conditions: Vec<Condition> = conditions.into_iter().collect();
    conditions.sort_by_key(|c| (c.clauses, c.literals));
    Ok(conditions)
}

/// All satisfiable, pairwise non-equivalent partial configurations that
/// deselect some combination of edited artifacts
///
/// The first configuration is always `true`, the view showing everything.
pub fn unique_partial_configs(
    tree: &VariationDiff,
    oracle: &dyn FormulaOracle,
    limits: &EnumerationLimits,
) -> Result<Vec<Formula>, ViewError> {
    let conditions = deselection_conditions(tree, oracle)?;
    let count = conditions.len();
    let max = usize::BITS as usize - 1;
    if count > max {
        return Err(ViewError::TooManyDistinctConditions { count, max });
    }
    tracing::info!(conditions = count, "enumerating partial configurations");

    let end = 1_usize << count;
    let mut unsatisfiable: Vec<usize> = Vec::new();
    let mut satisfiable: Vec<Formula> = Vec::new();
    let mut iterations = 0_u64;
    let mut v = 0_usize;
    while v < end {
        if unsatisfiable.iter().any(|mask| v & mask == *mask) {
            v += 1;
            continue;
        }
        if limits.exhausted(iterations) {
            return Err(ViewError::EnumerationBudgetExhausted { iterations });
        }
        iterations += 1;

        let candidate = Formula::and(
            conditions
                .iter()
                .enumerate()
                .filter(|(bit, _)| v & (1 << bit) != 0)
                .map(|(_, c)| c.formula.clone()),
        );
        if oracle.is_satisfiable(&candidate)? {
            satisfiable.push(candidate);
            v += 1;
        } else {
            unsatisfiable.push(v);
            // adding bits below the lowest set one keeps it unsatisfiable
            v += (v & v.wrapping_neg()).max(1);
        }
    }

    let configs = remove_equivalent(satisfiable, oracle)?;
    tracing::info!(iterations, configurations = configs.len(), "enumerated partial configurations");
    Ok(configs)
}

/// Drop every formula equivalent to an earlier one
fn remove_equivalent(formulas: Vec<Formula>, oracle: &dyn FormulaOracle) -> Result<Vec<Formula>, ViewError> {
    let mut unique: Vec<Formula> = Vec::with_capacity(formulas.len());
    'candidates: for formula in formulas {
        for kept in &unique {
            if *kept == formula || oracle.equivalent(kept, &formula)? {
                continue 'candidates;
            }
        }
        unique.push(formula);
    }
    Ok(unique)
}

/// Every distinct view of the diff, paired with the configuration selecting it
pub fn unique_views(
    tree: &VariationDiff,
    oracle: &dyn FormulaOracle,
    limits: &EnumerationLimits,
) -> Result<Vec<(Formula, VariationDiff)>, ViewError> {
    unique_partial_configs(tree, oracle, limits)?
        .into_iter()
        .map(|config| {
            let view = optimized_view(tree, &Configure::new(config.clone()), oracle)?;
            Ok((config, view))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdiff_formula::SatOracle;
    use vdiff_tree::{DiffType, LineNumber};

    fn v(name: &str) -> Formula {
        Formula::var(name)
    }

    /// One added artifact below a new `#if` per feature
    fn added_features(features: &[&str]) -> VariationDiff {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        for feature in features {
            let annotation = tree.create_if(DiffType::Added, v(feature));
            let line = tree.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["x"]);
            tree.add_below(annotation, None, Some(root)).unwrap();
            tree.add_below(line, None, Some(annotation)).unwrap();
        }
        tree
    }

    #[test]
    fn conditions_are_negated_and_deduplicated() {
        let tree = added_features(&["A", "B", "A"]);
        let conditions = deselection_conditions(&tree, &SatOracle::new()).unwrap();
        let formulas: Vec<Formula> = conditions.into_iter().map(|c| c.formula).collect();
        assert_eq!(formulas, vec![v("A").negate(), v("B").negate()]);
    }

    #[test]
    fn independent_features_give_every_combination() {
        let tree = added_features(&["A", "B"]);
        let configs = unique_partial_configs(&tree, &SatOracle::new(), &EnumerationLimits::unlimited()).unwrap();
        assert_eq!(
            configs,
            vec![
                Formula::True,
                v("A").negate(),
                v("B").negate(),
                Formula::and([v("A").negate(), v("B").negate()]),
            ]
        );
    }

    #[test]
    fn untouched_diffs_have_a_single_view() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let line = tree.create_artifact(DiffType::Unchanged, LineNumber::INVALID, LineNumber::INVALID, ["x"]);
        tree.add_below(line, Some(root), Some(root)).unwrap();

        let views = unique_views(&tree, &SatOracle::new(), &EnumerationLimits::unlimited()).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].0, Formula::True);
        assert!(views[0].1.is_same_as(&tree));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let tree = added_features(&["A", "B", "C"]);
        let limits = EnumerationLimits::unlimited().with_max_iterations(2);
        let err = unique_partial_configs(&tree, &SatOracle::new(), &limits).unwrap_err();
        assert_eq!(err, ViewError::EnumerationBudgetExhausted { iterations: 2 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn elapsed_deadline_stops_immediately() {
        let tree = added_features(&["A"]);
        let limits = EnumerationLimits::unlimited().with_time_budget(Duration::ZERO);
        let err = unique_partial_configs(&tree, &SatOracle::new(), &limits).unwrap_err();
        assert_eq!(err, ViewError::EnumerationBudgetExhausted { iterations: 0 });
    }

    #[test]
    fn equivalent_formulas_are_dropped() {
        let a_or_b = Formula::or([v("A"), v("B")]);
        let b_or_a = Formula::or([v("B"), v("A")]);
        let unique = remove_equivalent(vec![a_or_b.clone(), v("A"), b_or_a, a_or_b.clone()], &SatOracle::new()).unwrap();
        assert_eq!(unique, vec![a_or_b, v("A")]);
    }
}
