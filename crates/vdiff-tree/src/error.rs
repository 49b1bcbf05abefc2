//! Error types for tree construction and queries

use crate::node::NodeId;
use crate::time::{DiffType, NodeType, Time};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Tree errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An edge would violate the structural invariants
    #[error("cannot attach {child} below {parent} {time} the edit: {reason}")]
    InvalidAttachment {
        /// Prospective parent
        parent: NodeId,
        /// Prospective child
        child: NodeId,
        /// Time of the edge
        time: Time,
        /// Rejected invariant
        reason: AttachmentRejection,
    },

    /// An `Elif`/`Else` chain does not end in an `If`
    #[error("broken annotation chain above {node} {time} the edit: found {found} at {ancestor}")]
    BrokenChain {
        /// Node whose condition was requested
        node: NodeId,
        /// Chain member that is neither `If` nor `Elif`
        ancestor: NodeId,
        /// Its type
        found: NodeType,
        /// Time of the query
        time: Time,
    },

    /// A time-dependent query on a node absent at that time
    #[error("{node} is {diff_type} and does not exist {time} the edit")]
    NodeDoesNotExistAtTime {
        /// Queried node
        node: NodeId,
        /// Its diff type
        diff_type: DiffType,
        /// Time of the query
        time: Time,
    },

    /// A non-root node lacks the parent its diff type requires
    #[error("{node} has no parent {time} the edit")]
    Detached {
        /// Orphaned node
        node: NodeId,
        /// Time without a parent
        time: Time,
    },

    /// The root has no feature mapping
    #[error("feature mapping is undefined for the root")]
    UndefinedForRoot,

    /// Handle from a different tree
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Annotation created with a formula that does not fit its type
    #[error("invalid {node_type} annotation: {reason}")]
    InvalidAnnotation {
        /// Requested node type
        node_type: NodeType,
        /// Mismatch
        reason: &'static str,
    },
}

impl TreeError {
    /// Check if the error points at a malformed tree rather than a bad query
    #[inline]
    #[must_use]
    pub fn is_malformed_tree(&self) -> bool {
        matches!(
            self,
            TreeError::BrokenChain { .. } | TreeError::Detached { .. }
        )
    }
}

/// Invariant an attachment would have broken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRejection {
    /// The child is absent at the requested time
    ChildAbsent,
    /// The parent is absent at the requested time
    ParentAbsent,
    /// The child already has this parent at the requested time
    AlreadyAttached(NodeId),
    /// `Elif` and `Else` may only follow `If` or `Elif`
    NotAChainParent(NodeType),
    /// The root never has a parent
    RootAsChild,
    /// The child is the parent or one of its ancestors
    Cycle,
    /// Insertion position past the end of the child list
    IndexOutOfBounds {
        /// Requested position
        index: usize,
        /// Child list length
        len: usize,
    },
}

impl Display for AttachmentRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChildAbsent => write!(f, "child does not exist at that time"),
            Self::ParentAbsent => write!(f, "parent does not exist at that time"),
            Self::AlreadyAttached(p) => write!(f, "child already has parent {p}"),
            Self::NotAChainParent(t) => write!(f, "elif and else cannot be placed below {t}"),
            Self::RootAsChild => write!(f, "the root cannot have a parent"),
            Self::Cycle => write!(f, "edge would create a cycle"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} children")
            }
        }
    }
}
