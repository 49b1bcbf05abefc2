//! Regular conjunctive normal form
//!
//! Provides [`Cnf`], a canonical clause representation used as a cheap
//! syntactic normalisation before falling back to oracle queries.
//! Literals inside a clause are sorted by variable name and clauses are
//! sorted by their size and then by their literals, so two formulas with the
//! same clause set print and compare identically.

use crate::formula::Formula;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Possibly negated variable
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Variable name
    pub name: String,
    /// `false` for a negated variable
    pub positive: bool,
}

impl Literal {
    /// Create literal
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, positive: bool) -> Self {
        Self {
            name: name.into(),
            positive,
        }
    }

    /// The complementary literal
    #[inline]
    #[must_use]
    pub fn complement(&self) -> Self {
        Self::new(self.name.clone(), !self.positive)
    }

    /// Convert to a formula
    #[inline]
    #[must_use]
    pub fn to_formula(&self) -> Formula {
        let var = Formula::var(self.name.clone());
        if self.positive {
            var
        } else {
            var.negate()
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.name)
        } else {
            write!(f, "¬{}", self.name)
        }
    }
}

/// Disjunction of literals
pub type Clause = Vec<Literal>;

/// Formula in regular conjunctive normal form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cnf {
    clauses: Vec<Clause>,
}

impl Cnf {
    /// Build a sorted, duplicate-free CNF from raw clauses
    ///
    /// Tautological clauses (containing a literal and its complement) are
    /// dropped.
    #[must_use]
    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut normalized: Vec<Clause> = clauses
            .into_iter()
            .filter_map(|mut clause| {
                clause.sort();
                clause.dedup();
                let tautology = clause
                    .windows(2)
                    .any(|pair| pair[0].name == pair[1].name && pair[0].positive != pair[1].positive);
                (!tautology).then_some(clause)
            })
            .collect();
        normalized.sort_by(compare_clauses);
        normalized.dedup();
        Self {
            clauses: normalized,
        }
    }

    /// Clauses in canonical order
    #[inline]
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses
    #[inline]
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of literal occurrences
    #[inline]
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Vec::len).sum()
    }

    /// Check if the CNF has no clauses (is trivially true)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Convert back into a formula
    ///
    /// Single-literal clauses become bare literals; the empty CNF is `True`
    /// and an empty clause is `False`.
    #[must_use]
    pub fn to_formula(&self) -> Formula {
        Formula::and(
            self.clauses
                .iter()
                .map(|clause| Formula::or(clause.iter().map(Literal::to_formula))),
        )
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formula())
    }
}

fn compare_clauses(a: &Clause, b: &Clause) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Formula {
    /// Convert to regular CNF by distribution
    ///
    /// Returns `None` if any intermediate clause set would exceed
    /// `max_clauses`, since distribution is exponential in the worst case.
    #[must_use]
    pub fn to_regular_cnf(&self, max_clauses: usize) -> Option<Cnf> {
        let clauses = distribute(&self.eliminate_true_false(), true, max_clauses)?;
        Some(Cnf::from_clauses(clauses))
    }
}

/// CNF clauses of `f` (or of `¬f` when `positive` is false)
fn distribute(f: &Formula, positive: bool, max_clauses: usize) -> Option<Vec<Clause>> {
    match (f, positive) {
        (Formula::True, true) | (Formula::False, false) => Some(Vec::new()),
        (Formula::False, true) | (Formula::True, false) => Some(vec![Vec::new()]),
        (Formula::Var(name), _) => Some(vec![vec![Literal::new(name.clone(), positive)]]),
        (Formula::Not(inner), _) => distribute(inner, !positive, max_clauses),
        // conjunction (or negated disjunction): concatenate clause sets
        (Formula::And(ops), true) | (Formula::Or(ops), false) => {
            let mut clauses = Vec::new();
            for op in ops {
                clauses.extend(distribute(op, positive, max_clauses)?);
                if clauses.len() > max_clauses {
                    return None;
                }
            }
            Some(clauses)
        }
        // disjunction (or negated conjunction): cross product of clause sets
        (Formula::Or(ops), true) | (Formula::And(ops), false) => {
            let mut product: Vec<Clause> = vec![Vec::new()];
            for op in ops {
                let op_clauses = distribute(op, positive, max_clauses)?;
                if product.len().saturating_mul(op_clauses.len()) > max_clauses {
                    return None;
                }
                let mut next = Vec::with_capacity(product.len() * op_clauses.len());
                for left in &product {
                    for right in &op_clauses {
                        let mut merged = left.clone();
                        merged.extend(right.iter().cloned());
                        next.push(merged);
                    }
                }
                product = next;
            }
            Some(product)
        }
    }
}
