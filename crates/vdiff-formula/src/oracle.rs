//! Formula oracle interface
//!
//! The oracle answers satisfiability questions about [`Formula`]s. It is a
//! black box to the rest of the workspace: any implementation that is
//! correct and deterministic may be plugged in.

use crate::formula::Formula;
use std::sync::Arc;

/// Errors reported by an oracle
///
/// An oracle error must never be interpreted as a negative answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The underlying solver failed
    #[error("solver failure: {0}")]
    Solver(String),

    /// The query did not finish in time
    #[error("oracle query timed out after {elapsed_ms}ms")]
    Timeout {
        /// Time spent before giving up
        elapsed_ms: u64,
    },
}

/// Satisfiability oracle for propositional formulas
///
/// Only [`is_satisfiable`](FormulaOracle::is_satisfiable) is required; the
/// other queries reduce to it.
pub trait FormulaOracle: Send + Sync {
    /// Check if some assignment satisfies the formula
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError>;

    /// Check if every assignment satisfies the formula
    fn is_tautology(&self, formula: &Formula) -> Result<bool, OracleError> {
        Ok(!self.is_satisfiable(&formula.negate())?)
    }

    /// Check if `a ⇒ b` is a tautology
    fn implies(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        Ok(!self.is_satisfiable(&Formula::and([a.clone(), b.negate()]))?)
    }

    /// Check if `a` and `b` are logically equivalent
    fn equivalent(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        Ok(self.implies(a, b)? && self.implies(b, a)?)
    }
}

impl<O: FormulaOracle + ?Sized> FormulaOracle for &O {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError> {
        (**self).is_satisfiable(formula)
    }

    fn is_tautology(&self, formula: &Formula) -> Result<bool, OracleError> {
        (**self).is_tautology(formula)
    }

    fn implies(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        (**self).implies(a, b)
    }

    fn equivalent(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        (**self).equivalent(a, b)
    }
}

impl<O: FormulaOracle + ?Sized> FormulaOracle for Arc<O> {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError> {
        (**self).is_satisfiable(formula)
    }

    fn is_tautology(&self, formula: &Formula) -> Result<bool, OracleError> {
        (**self).is_tautology(formula)
    }

    fn implies(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        (**self).implies(a, b)
    }

    fn equivalent(&self, a: &Formula, b: &Formula) -> Result<bool, OracleError> {
        (**self).equivalent(a, b)
    }
}
