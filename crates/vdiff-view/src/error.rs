//! Error types for view extraction and enumeration

use thiserror::Error;
use vdiff_formula::OracleError;
use vdiff_pattern::ClassifyError;
use vdiff_tree::TreeError;

/// View errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// More distinct conditions than the enumeration bit vector can index
    #[error("cannot enumerate views over {count} distinct conditions (at most {max})")]
    TooManyDistinctConditions {
        /// Distinct negated presence conditions found
        count: usize,
        /// Largest supported count
        max: usize,
    },

    /// Iteration cap or deadline reached during enumeration
    #[error("view enumeration stopped after {iterations} iterations")]
    EnumerationBudgetExhausted {
        /// Candidate subsets checked before stopping
        iterations: u64,
    },

    /// Tree error
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Oracle error
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// Classification error
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),
}

impl ViewError {
    /// Check if the caller can recover, e.g. by sampling instead of
    /// enumerating exhaustively
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ViewError::TooManyDistinctConditions { .. } | ViewError::EnumerationBudgetExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverability() {
        assert!(ViewError::EnumerationBudgetExhausted { iterations: 3 }.is_recoverable());
        assert!(ViewError::TooManyDistinctConditions { count: 64, max: 63 }.is_recoverable());
        assert!(!ViewError::Oracle(OracleError::Timeout { elapsed_ms: 1 }).is_recoverable());
        assert!(!ViewError::Tree(TreeError::UndefinedForRoot).is_recoverable());
    }
}
