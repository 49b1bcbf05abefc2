//! Relevance predicates and the node sets they select
//!
//! A [`Relevance`] decides for a single node at a single time whether it
//! matters to the user. The view of a diff keeps every relevant node together
//! with its ancestors, so the outcome of a query is a [`ViewNodes`] set that
//! is closed under the parent relation at that time.

use crate::error::ViewError;
use std::fmt::Display;
use vdiff_formula::FormulaOracle;
use vdiff_tree::{NodeId, Time, VariationDiff};

/// Nodes of one diff selected for a view at one time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNodes {
    members: Vec<bool>,
    order: Vec<NodeId>,
}

impl ViewNodes {
    /// Empty selection for a diff whose arena holds `arena_len` nodes
    #[must_use]
    pub fn new(arena_len: usize) -> Self {
        Self {
            members: vec![false; arena_len],
            order: Vec::new(),
        }
    }

    /// Add `id`; returns `false` if it was selected already
    pub fn insert(&mut self, id: NodeId) -> bool {
        let index = id.index();
        if index >= self.members.len() {
            self.members.resize(index + 1, false);
        }
        if std::mem::replace(&mut self.members[index], true) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Check if `id` is selected
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.get(id.index()).copied().unwrap_or(false)
    }

    /// Number of selected nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected node ids in insertion order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Add every ancestor at `time` of every selected node
    pub fn close_under_ancestors(&mut self, tree: &VariationDiff, time: Time) {
        let selected = self.order.clone();
        for id in selected {
            for ancestor in tree.ancestors(id, time) {
                if !self.insert(ancestor) {
                    break;
                }
            }
        }
    }
}

/// Predicate deciding which nodes a view keeps
///
/// Implementations only need [`test`](Relevance::test). The default
/// [`compute_view_nodes`](Relevance::compute_view_nodes) walks the tree
/// bottom-up and skips `test` for nodes that already have a relevant
/// descendant; implementations that can prune whole subtrees override it.
pub trait Relevance: Display + Send + Sync {
    /// Check if `node` is relevant at `time`
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError>;

    /// Relevant nodes existing at `time` and their ancestors, plus the root
    fn compute_view_nodes(
        &self,
        tree: &VariationDiff,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<ViewNodes, ViewError> {
        let mut view = ViewNodes::new(tree.arena_len());
        for id in postorder_at(tree, time) {
            let relevant = id == tree.root()
                || tree.children_at(id, time).any(|child| view.contains(child))
                || self.test(tree, id, time, oracle)?;
            if relevant {
                view.insert(id);
            }
        }
        Ok(view)
    }
}

impl<R: Relevance + ?Sized> Relevance for &R {
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError> {
        (**self).test(tree, node, time, oracle)
    }

    fn compute_view_nodes(
        &self,
        tree: &VariationDiff,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<ViewNodes, ViewError> {
        (**self).compute_view_nodes(tree, time, oracle)
    }
}

/// Nodes of the tree at `time` in depth-first pre-order
pub(crate) fn preorder_at(tree: &VariationDiff, time: Time) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        order.push(id);
        let first = stack.len();
        stack.extend(tree.children_at(id, time));
        stack[first..].reverse();
    }
    order
}

/// Nodes of the tree at `time` in depth-first post-order
pub(crate) fn postorder_at(tree: &VariationDiff, time: Time) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(tree.root(), false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        stack.push((id, true));
        let first = stack.len();
        stack.extend(tree.children_at(id, time).map(|child| (child, false)));
        stack[first..].reverse();
    }
    order
}
