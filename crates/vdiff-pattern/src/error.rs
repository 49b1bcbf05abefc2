//! Error types for classification

use thiserror::Error;
use vdiff_formula::OracleError;
use vdiff_tree::{NodeId, NodeType, TreeError};

/// Classification errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// Only artifacts have edit patterns
    #[error("expected an artifact but {node} is {node_type}")]
    NotAnArtifact {
        /// Rejected node
        node: NodeId,
        /// Its type
        node_type: NodeType,
    },

    /// Presence condition could not be computed
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// The oracle failed; the pattern is unknown
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
}

impl ClassifyError {
    /// Check if the error came from the oracle
    #[inline]
    #[must_use]
    pub fn is_oracle_failure(&self) -> bool {
        matches!(self, ClassifyError::Oracle(_))
    }
}
