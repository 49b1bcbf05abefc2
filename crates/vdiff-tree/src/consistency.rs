//! Structural invariant checks
//!
//! The mutation API already refuses most invalid edges; these checks catch
//! the remaining cases, such as a node that only received a parent at one of
//! the two times its diff type requires.

use crate::node::NodeId;
use crate::time::{DiffType, NodeType, Time};
use crate::tree::VariationDiff;
use thiserror::Error;

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyViolation {
    /// The root has a parent
    #[error("the root has a parent {time} the edit")]
    RootHasParent {
        /// Time of the offending edge
        time: Time,
    },

    /// A node is listed as a child without having that parent at any time
    #[error("{child} is listed as child of {parent} but is not attached to it")]
    StrayChild {
        /// Listing node
        parent: NodeId,
        /// Listed node
        child: NodeId,
    },

    /// A node is listed twice in one child list
    #[error("{child} is listed more than once as child of {parent}")]
    DuplicateChild {
        /// Listing node
        parent: NodeId,
        /// Repeated node
        child: NodeId,
    },

    /// A parent link without the matching child list entry
    #[error("{child} has parent {parent} {time} the edit but is not among its children")]
    MissingFromChildList {
        /// Linked parent
        parent: NodeId,
        /// Linking node
        child: NodeId,
        /// Time of the link
        time: Time,
    },

    /// The times a node has parents at do not match its diff type
    #[error("{node} is {diff_type} but has parents before: {before}, after: {after}")]
    ParentsContradictDiffType {
        /// Offending node
        node: NodeId,
        /// Its diff type
        diff_type: DiffType,
        /// Whether it has a parent before the edit
        before: bool,
        /// Whether it has a parent after the edit
        after: bool,
    },

    /// An `Elif` or `Else` outside of an annotation chain
    #[error("{node} is placed below {parent_type} {parent} {time} the edit")]
    ChainParent {
        /// Offending branch
        node: NodeId,
        /// Its parent
        parent: NodeId,
        /// Parent type
        parent_type: NodeType,
        /// Time of the edge
        time: Time,
    },

    /// A formula on a node type that must not have one, or vice versa
    #[error("{node} is {node_type} but {}", formula_presence(.has_formula))]
    FormulaPresence {
        /// Offending node
        node: NodeId,
        /// Its type
        node_type: NodeType,
        /// Whether a formula is present
        has_formula: bool,
    },
}

fn formula_presence(has_formula: &bool) -> &'static str {
    if *has_formula {
        "carries a formula"
    } else {
        "lacks a formula"
    }
}

impl VariationDiff {
    /// Check the structural invariants of every node reachable from the root
    pub fn check_consistency(&self) -> Result<(), ConsistencyViolation> {
        let root = self.node(self.root());
        for time in Time::ALL {
            if root.parent(time).is_some() {
                return Err(ConsistencyViolation::RootHasParent { time });
            }
        }

        for id in self.preorder() {
            let node = self.node(id);

            let children = node.children();
            for (i, &child) in children.iter().enumerate() {
                if children[..i].contains(&child) {
                    return Err(ConsistencyViolation::DuplicateChild { parent: id, child });
                }
                let c = self.node(child);
                if c.parent(Time::Before) != Some(id) && c.parent(Time::After) != Some(id) {
                    return Err(ConsistencyViolation::StrayChild { parent: id, child });
                }
            }

            if node.is_root() {
                continue;
            }

            for time in Time::ALL {
                if let Some(parent) = node.parent(time) {
                    let p = self.node(parent);
                    if !p.children().contains(&id) {
                        return Err(ConsistencyViolation::MissingFromChildList {
                            parent,
                            child: id,
                            time,
                        });
                    }
                    if matches!(node.node_type(), NodeType::Elif | NodeType::Else)
                        && !p.node_type().is_conditional_annotation()
                    {
                        return Err(ConsistencyViolation::ChainParent {
                            node: id,
                            parent,
                            parent_type: p.node_type(),
                            time,
                        });
                    }
                }
            }

            let before = node.parent(Time::Before).is_some();
            let after = node.parent(Time::After).is_some();
            if DiffType::from_existence(before, after) != Some(node.diff_type()) {
                return Err(ConsistencyViolation::ParentsContradictDiffType {
                    node: id,
                    diff_type: node.diff_type(),
                    before,
                    after,
                });
            }

            let has_formula = node.direct_formula().is_some();
            if has_formula != node.node_type().is_conditional_annotation() {
                return Err(ConsistencyViolation::FormulaPresence {
                    node: id,
                    node_type: node.node_type(),
                    has_formula,
                });
            }
        }
        Ok(())
    }

    /// Panic with the first broken invariant, if any
    ///
    /// # Panics
    ///
    /// Panics if [`check_consistency`](Self::check_consistency) fails.
    pub fn assert_consistency(&self) {
        if let Err(violation) = self.check_consistency() {
            panic!("inconsistent variation diff: {violation}");
        }
    }
}
