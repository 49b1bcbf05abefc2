//! Whole-tree transformations

use crate::error::TreeError;
use crate::node::{DiffNode, NodeId};
use crate::time::{DiffType, Time};
use crate::tree::VariationDiff;

impl VariationDiff {
    /// The plain variation tree at `time`
    ///
    /// Keeps exactly the nodes that exist at `time`, attached as they were at
    /// that time and marked unchanged.
    pub fn project(&self, time: Time) -> Result<VariationDiff, TreeError> {
        let mut projection = VariationDiff::new();
        let mut stack: Vec<(NodeId, NodeId)> = self
            .children_at(self.root(), time)
            .map(|child| (child, projection.root()))
            .collect();
        stack.reverse();

        while let Some((id, new_parent)) = stack.pop() {
            let copy = projection.copy_node(self.node(id), DiffType::Unchanged);
            projection.add_below(copy, Some(new_parent), Some(new_parent))?;
            let first = stack.len();
            stack.extend(self.children_at(id, time).map(|child| (child, copy)));
            stack[first..].reverse();
        }
        Ok(projection)
    }

    /// Create a detached copy of `node`'s content with a new diff type
    ///
    /// `node` may belong to another diff. Line numbers are restricted to the
    /// times at which the copy exists.
    pub fn copy_node(&mut self, node: &DiffNode, diff_type: DiffType) -> NodeId {
        self.push(DiffNode::new(
            diff_type,
            node.node_type(),
            node.from_line(),
            node.to_line(),
            node.direct_formula().cloned(),
            node.label_lines().to_vec(),
        ))
    }

    /// Remove unchanged subtrees that contain no edit
    ///
    /// Works bottom-up: an unchanged node whose ancestors are identical at
    /// both times is dropped once all of its children have been dropped. A
    /// node below a moved annotation is kept even if its own parent did not
    /// change. Returns the number of dropped nodes.
    pub fn cut_non_edited_subtrees(&mut self) -> usize {
        let mut cut = 0;
        for id in self.postorder() {
            let node = self.node(id);
            let untouched = !node.is_root()
                && node.is_unchanged()
                && node.children().is_empty()
                && self.before_path_equals_after_path(id);
            if untouched {
                self.drop_node(id);
                cut += 1;
            }
        }
        tracing::debug!(cut, remaining = self.node_count(), "cut non-edited subtrees");
        cut
    }
}
