//! Error types for VDiff Core

use vdiff_formula::OracleError;
use vdiff_pattern::ClassifyError;
use vdiff_tree::TreeError;
use vdiff_view::ViewError;

/// Main analysis error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Tree construction or traversal failed
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Oracle failed
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// Classification failed
    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),

    /// View extraction or enumeration failed
    #[error("view failed: {0}")]
    View(#[from] ViewError),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Check if the analysis can continue without the failed result
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::View(err) if err.is_recoverable())
    }

    /// Check if the error originates in the oracle, however deep
    #[must_use]
    pub fn is_oracle_failure(&self) -> bool {
        match self {
            Self::Oracle(_) => true,
            Self::Classify(err) => err.is_oracle_failure(),
            Self::View(ViewError::Oracle(_)) => true,
            Self::View(ViewError::Classify(err)) => err.is_oracle_failure(),
            _ => false,
        }
    }
}

/// Result alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
