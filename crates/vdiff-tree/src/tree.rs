//! The variation diff arena
//!
//! [`VariationDiff`] owns every node it ever created. Nodes are linked by
//! [`NodeId`]s, one parent per [`Time`] and one ordered child list shared by
//! both times. All edge mutations go through this type so the structural
//! invariants are checked at the API boundary.

use crate::error::{AttachmentRejection, TreeError};
use crate::lines::LineNumber;
use crate::node::{DiffNode, NodeId};
use crate::time::{DiffType, NodeType, Time};
use vdiff_formula::Formula;

/// A variation diff: one tree describing a preprocessor-annotated file at two
/// points in time
#[derive(Debug, Clone)]
pub struct VariationDiff {
    nodes: Vec<DiffNode>,
    root: NodeId,
}

impl Default for VariationDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl VariationDiff {
    /// Create a diff consisting only of the root
    #[must_use]
    pub fn new() -> Self {
        let root = DiffNode::new(
            DiffType::Unchanged,
            NodeType::Root,
            LineNumber::INVALID,
            LineNumber::INVALID,
            None,
            Vec::new(),
        );
        Self {
            nodes: vec![root],
            root: NodeId::from_index(0),
        }
    }

    /// The root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node, returning `None` for handles of other trees
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DiffNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DiffNode {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node's content
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut DiffNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes ever created, including detached ones
    #[inline]
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push(&mut self, node: DiffNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a detached artifact node
    pub fn create_artifact<I, S>(
        &mut self,
        diff_type: DiffType,
        from: LineNumber,
        to: LineNumber,
        lines: I,
    ) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = lines.into_iter().map(Into::into).collect();
        self.push(DiffNode::new(diff_type, NodeType::Artifact, from, to, None, label))
    }

    /// Create a detached annotation node
    ///
    /// `If` and `Elif` require a formula, `Else` must not have one. Roots and
    /// artifacts cannot be created this way.
    pub fn create_annotation<I, S>(
        &mut self,
        diff_type: DiffType,
        node_type: NodeType,
        formula: Option<Formula>,
        from: LineNumber,
        to: LineNumber,
        lines: I,
    ) -> Result<NodeId, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invalid = |reason| Err(TreeError::InvalidAnnotation { node_type, reason });
        match (node_type, &formula) {
            (NodeType::Root, _) => return invalid("a variation diff has exactly one root"),
            (NodeType::Artifact, _) => return invalid("artifacts are not annotations"),
            (NodeType::If | NodeType::Elif, None) => return invalid("missing formula"),
            (NodeType::Else, Some(_)) => return invalid("else has no formula of its own"),
            _ => {}
        }
        let label = lines.into_iter().map(Into::into).collect();
        Ok(self.push(DiffNode::new(diff_type, node_type, from, to, formula, label)))
    }

    /// Create a detached `#if` node labelled with its formula
    pub fn create_if(&mut self, diff_type: DiffType, formula: Formula) -> NodeId {
        let label = vec![format!("#if {formula}")];
        self.push(DiffNode::new(
            diff_type,
            NodeType::If,
            LineNumber::INVALID,
            LineNumber::INVALID,
            Some(formula),
            label,
        ))
    }

    /// Create a detached `#elif` node labelled with its formula
    pub fn create_elif(&mut self, diff_type: DiffType, formula: Formula) -> NodeId {
        let label = vec![format!("#elif {formula}")];
        self.push(DiffNode::new(
            diff_type,
            NodeType::Elif,
            LineNumber::INVALID,
            LineNumber::INVALID,
            Some(formula),
            label,
        ))
    }

    /// Create a detached `#else` node
    pub fn create_else(&mut self, diff_type: DiffType) -> NodeId {
        self.push(DiffNode::new(
            diff_type,
            NodeType::Else,
            LineNumber::INVALID,
            LineNumber::INVALID,
            None,
            vec!["#else".to_owned()],
        ))
    }

    fn check_known(&self, ids: &[NodeId]) -> Result<(), TreeError> {
        match ids.iter().find(|id| self.get(**id).is_none()) {
            Some(&unknown) => Err(TreeError::UnknownNode(unknown)),
            None => Ok(()),
        }
    }

    fn check_attachment(&self, parent: NodeId, child: NodeId, time: Time) -> Result<(), TreeError> {
        let reject = |reason| {
            Err(TreeError::InvalidAttachment {
                parent,
                child,
                time,
                reason,
            })
        };
        let c = self.node(child);
        let p = self.node(parent);

        if c.is_root() {
            return reject(AttachmentRejection::RootAsChild);
        }
        if !c.exists_at_time(time) {
            return reject(AttachmentRejection::ChildAbsent);
        }
        if !p.exists_at_time(time) {
            return reject(AttachmentRejection::ParentAbsent);
        }
        if let Some(existing) = c.parent(time) {
            return reject(AttachmentRejection::AlreadyAttached(existing));
        }
        if matches!(c.node_type(), NodeType::Elif | NodeType::Else)
            && !p.node_type().is_conditional_annotation()
        {
            return reject(AttachmentRejection::NotAChainParent(p.node_type()));
        }
        if child == parent || self.is_ancestor(child, parent, time) {
            return reject(AttachmentRejection::Cycle);
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, time: Time, index: Option<usize>) {
        self.nodes[child.index()].set_parent(time, Some(parent));
        let children = self.nodes[parent.index()].children_mut();
        if !children.contains(&child) {
            match index {
                Some(i) => children.insert(i, child),
                None => children.push(child),
            }
        }
    }

    /// Make `child` the last child of `parent` at `time`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, time: Time) -> Result<(), TreeError> {
        self.check_known(&[parent, child])?;
        self.check_attachment(parent, child, time)?;
        self.link(parent, child, time, None);
        Ok(())
    }

    /// Make `child` a child of `parent` at `time`, inserted at `index`
    ///
    /// If the child is already listed because it is attached to `parent` at
    /// the other time, its position is kept.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
        time: Time,
    ) -> Result<(), TreeError> {
        self.check_known(&[parent, child])?;
        self.check_attachment(parent, child, time)?;
        let len = self.node(parent).children().len();
        if index > len {
            return Err(TreeError::InvalidAttachment {
                parent,
                child,
                time,
                reason: AttachmentRejection::IndexOutOfBounds { index, len },
            });
        }
        self.link(parent, child, time, Some(index));
        Ok(())
    }

    /// Attach `child` below the given parent at each time one is given
    ///
    /// Both edges are validated before either is created.
    pub fn add_below(
        &mut self,
        child: NodeId,
        before_parent: Option<NodeId>,
        after_parent: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let edges = [(Time::Before, before_parent), (Time::After, after_parent)];
        for (time, parent) in edges {
            if let Some(parent) = parent {
                self.check_known(&[parent, child])?;
                self.check_attachment(parent, child, time)?;
            }
        }
        for (time, parent) in edges {
            if let Some(parent) = parent {
                self.link(parent, child, time, None);
            }
        }
        Ok(())
    }

    /// Detach `child` from `parent` at `time`
    ///
    /// Returns `false` if `parent` was not the child's parent at that time.
    /// The child leaves the child list once it is detached at both times.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId, time: Time) -> bool {
        if self.check_known(&[parent, child]).is_err() || self.node(child).parent(time) != Some(parent) {
            return false;
        }
        self.nodes[child.index()].set_parent(time, None);
        if self.node(child).parent(time.other()) != Some(parent) {
            self.nodes[parent.index()]
                .children_mut()
                .retain(|c| *c != child);
        }
        true
    }

    /// Detach every child of `parent` at `time`, returning them in order
    pub fn remove_children(&mut self, parent: NodeId, time: Time) -> Vec<NodeId> {
        let orphans: Vec<NodeId> = self.children_at(parent, time).collect();
        for &child in &orphans {
            self.remove_child(parent, child, time);
        }
        orphans
    }

    /// Detach a node from its parents at both times
    pub fn drop_node(&mut self, id: NodeId) {
        for time in Time::ALL {
            if let Some(parent) = self.get(id).and_then(|n| n.parent(time)) {
                self.remove_child(parent, id, time);
            }
        }
    }

    /// Move every child of `old_parent` below `new_parent`, keeping times and order
    ///
    /// Nothing is moved if any of the new edges would be invalid.
    pub fn steal_children_of(&mut self, new_parent: NodeId, old_parent: NodeId) -> Result<(), TreeError> {
        self.check_known(&[new_parent, old_parent])?;
        if new_parent == old_parent {
            return Ok(());
        }

        let target = self.node(new_parent);
        for time in Time::ALL {
            for child in self.children_at(old_parent, time) {
                let reject = |reason| {
                    Err(TreeError::InvalidAttachment {
                        parent: new_parent,
                        child,
                        time,
                        reason,
                    })
                };
                let node_type = self.node(child).node_type();
                if !target.exists_at_time(time) {
                    return reject(AttachmentRejection::ParentAbsent);
                }
                if matches!(node_type, NodeType::Elif | NodeType::Else)
                    && !target.node_type().is_conditional_annotation()
                {
                    return reject(AttachmentRejection::NotAChainParent(target.node_type()));
                }
                if child == new_parent || self.is_ancestor(child, new_parent, time) {
                    return reject(AttachmentRejection::Cycle);
                }
            }
        }

        for time in Time::ALL {
            for child in self.remove_children(old_parent, time) {
                self.link(new_parent, child, time, None);
            }
        }
        tracing::trace!(%new_parent, %old_parent, "moved children");
        Ok(())
    }

    /// Parent of `id` at `time`
    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId, time: Time) -> Option<NodeId> {
        self.node(id).parent(time)
    }

    /// Children of `id` that have it as parent at `time`, in order
    pub fn children_at(&self, id: NodeId, time: Time) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .children()
            .iter()
            .copied()
            .filter(move |c| self.node(*c).parent(time) == Some(id))
    }

    /// Proper ancestors of `id` at `time`, innermost first
    #[must_use]
    pub fn ancestors(&self, id: NodeId, time: Time) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent(time),
            time,
        }
    }

    /// Check if `ancestor` is a proper ancestor of `node` at `time`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId, time: Time) -> bool {
        self.ancestors(node, time).any(|a| a == ancestor)
    }

    pub(crate) fn require_existence(&self, id: NodeId, time: Time) -> Result<&DiffNode, TreeError> {
        let node = self.get(id).ok_or(TreeError::UnknownNode(id))?;
        if node.exists_at_time(time) {
            Ok(node)
        } else {
            Err(TreeError::NodeDoesNotExistAtTime {
                node: id,
                diff_type: node.diff_type(),
                time,
            })
        }
    }

    pub(crate) fn parent_at(&self, id: NodeId, time: Time) -> Result<NodeId, TreeError> {
        self.node(id)
            .parent(time)
            .ok_or(TreeError::Detached { node: id, time })
    }

    /// Number of edges between `id` and the root at `time`
    pub fn depth(&self, id: NodeId, time: Time) -> Result<usize, TreeError> {
        self.require_existence(id, time)?;
        let mut depth = 0;
        let mut current = id;
        while !self.node(current).is_root() {
            current = self.parent_at(current, time)?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Nearest proper ancestor at `time` that is an annotation
    #[must_use]
    pub fn enclosing_annotation(&self, id: NodeId, time: Time) -> Option<NodeId> {
        self.ancestors(id, time)
            .find(|a| self.node(*a).is_annotation())
    }

    /// The `If` heading the annotation chain `id` belongs to at `time`
    ///
    /// For an `If` this is the node itself; for `Elif`, `Else` and artifacts
    /// it is the nearest `If` ancestor. The root has none.
    #[must_use]
    pub fn if_node(&self, id: NodeId, time: Time) -> Option<NodeId> {
        let node = self.node(id);
        if node.is_if() {
            return Some(id);
        }
        if node.is_root() {
            return None;
        }
        self.ancestors(id, time).find(|a| self.node(*a).is_if())
    }

    /// Number of `If` nodes on the path from `id` (inclusive) to the root
    pub fn annotation_depth(&self, id: NodeId, time: Time) -> Result<usize, TreeError> {
        self.require_existence(id, time)?;
        let mut depth = 0;
        let mut current = id;
        loop {
            let node = self.node(current);
            if node.is_root() {
                return Ok(depth);
            }
            if node.is_if() {
                depth += 1;
            }
            current = self.parent_at(current, time)?;
        }
    }

    /// Number of annotations on the path to the root that only exist at `time`
    ///
    /// An inserted or deleted `Elif`/`Else` counts once for its whole chain.
    pub fn change_amount(&self, id: NodeId, time: Time) -> Result<usize, TreeError> {
        self.require_existence(id, time)?;
        let changed = DiffType::only_at(time);
        let mut amount = 0;
        let mut current = id;
        loop {
            let node = self.node(current);
            match node.node_type() {
                NodeType::Root => return Ok(amount),
                NodeType::If if node.diff_type() == changed => {
                    amount += 1;
                    current = self.parent_at(current, time)?;
                }
                NodeType::Elif | NodeType::Else if node.diff_type() == changed => {
                    amount += 1;
                    let head = self.if_node(current, time).ok_or(TreeError::Detached {
                        node: current,
                        time,
                    })?;
                    current = self.parent_at(head, time)?;
                }
                _ => current = self.parent_at(current, time)?,
            }
        }
    }

    /// Check if `id` has identical ancestors before and after the edit
    #[must_use]
    pub fn before_path_equals_after_path(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let node = self.node(current);
            let before = node.parent(Time::Before);
            if before != node.parent(Time::After) {
                return false;
            }
            match before {
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    /// Reachable nodes in depth-first pre-order
    ///
    /// A node attached below different parents at the two times is listed once.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            order.push(id);
            stack.extend(self.node(id).children().iter().rev().copied());
        }
        order
    }

    /// Reachable nodes in depth-first post-order
    #[must_use]
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            stack.push((id, true));
            for &child in self.node(id).children().iter().rev() {
                if !visited[child.index()] {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// Reachable artifacts in pre-order
    #[must_use]
    pub fn artifact_nodes(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.node(*id).is_artifact())
            .collect()
    }

    /// Reachable annotations other than the root, in pre-order
    #[must_use]
    pub fn annotation_nodes(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| {
                let node = self.node(*id);
                node.is_annotation() && !node.is_root()
            })
            .collect()
    }

    /// Check if any reachable node satisfies `predicate`
    pub fn any_match(&self, mut predicate: impl FnMut(NodeId, &DiffNode) -> bool) -> bool {
        self.preorder()
            .into_iter()
            .any(|id| predicate(id, self.node(id)))
    }

    /// Number of reachable nodes including the root
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// Structural equality up to node identities
    ///
    /// Two diffs are the same if their pre-orders match node by node in content,
    /// parents and child order.
    #[must_use]
    pub fn is_same_as(&self, other: &VariationDiff) -> bool {
        let left = self.preorder();
        let right = other.preorder();
        if left.len() != right.len() {
            return false;
        }

        let position = |order: &[NodeId], arena_len: usize| {
            let mut pos = vec![usize::MAX; arena_len];
            for (i, id) in order.iter().enumerate() {
                pos[id.index()] = i;
            }
            pos
        };
        let left_pos = position(&left, self.nodes.len());
        let right_pos = position(&right, other.nodes.len());

        left.iter().zip(&right).all(|(&l, &r)| {
            let ln = self.node(l);
            let rn = other.node(r);
            ln.same_content(rn)
                && Time::ALL.iter().all(|&t| {
                    ln.parent(t).map(|p| left_pos[p.index()])
                        == rn.parent(t).map(|p| right_pos[p.index()])
                })
                && ln.children().len() == rn.children().len()
                && ln
                    .children()
                    .iter()
                    .zip(rn.children())
                    .all(|(a, b)| left_pos[a.index()] == right_pos[b.index()])
        })
    }
}

/// Iterator over the proper ancestors of a node at one time
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a VariationDiff,
    next: Option<NodeId>,
    time: Time,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent(self.time);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn artifact(tree: &mut VariationDiff, diff_type: DiffType, text: &str) -> NodeId {
        tree.create_artifact(diff_type, LineNumber::INVALID, LineNumber::INVALID, [text])
    }

    #[test]
    fn add_child_rejects_second_parent() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let x = artifact(&mut tree, DiffType::Unchanged, "x");

        tree.add_child(root, a, Time::Before).unwrap();
        tree.add_child(root, x, Time::Before).unwrap();

        let err = tree.add_child(a, x, Time::Before).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttachment {
                reason: AttachmentRejection::AlreadyAttached(p),
                ..
            } if p == root
        ));
        assert_eq!(tree.parent(x, Time::Before), Some(root));
    }

    #[test]
    fn add_child_rejects_absent_child() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let added = artifact(&mut tree, DiffType::Added, "x");

        let err = tree.add_child(root, added, Time::Before).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttachment {
                reason: AttachmentRejection::ChildAbsent,
                ..
            }
        ));
        assert!(tree.node(root).children().is_empty());
    }

    #[test]
    fn else_needs_conditional_parent() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let orphan_else = tree.create_else(DiffType::Added);

        let err = tree.add_child(root, orphan_else, Time::After).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttachment {
                reason: AttachmentRejection::NotAChainParent(NodeType::Root),
                ..
            }
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let b = tree.create_if(DiffType::Unchanged, Formula::var("B"));
        tree.add_below(a, Some(root), Some(root)).unwrap();
        tree.add_below(b, Some(a), None).unwrap();

        let err = tree.add_child(b, a, Time::After).unwrap_err();
        assert!(matches!(err, TreeError::InvalidAttachment { .. }));

        // a is still free after the edit, but b is its descendant before
        tree.drop_node(a);
        let err = tree.add_child(b, a, Time::Before).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttachment {
                reason: AttachmentRejection::Cycle,
                ..
            }
        ));
    }

    #[test]
    fn child_list_is_shared_between_times() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let x = artifact(&mut tree, DiffType::Unchanged, "x");
        tree.add_below(x, Some(root), Some(root)).unwrap();
        assert_eq!(tree.node(root).children(), [x]);

        assert!(tree.remove_child(root, x, Time::Before));
        assert_eq!(tree.node(root).children(), [x]);
        assert!(!tree.remove_child(root, x, Time::Before));

        assert!(tree.remove_child(root, x, Time::After));
        assert!(tree.node(root).children().is_empty());
    }

    #[test]
    fn insert_child_keeps_order() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let x = artifact(&mut tree, DiffType::Added, "x");
        let y = artifact(&mut tree, DiffType::Added, "y");
        let z = artifact(&mut tree, DiffType::Added, "z");
        tree.add_child(root, x, Time::After).unwrap();
        tree.add_child(root, z, Time::After).unwrap();
        tree.insert_child(root, y, 1, Time::After).unwrap();
        assert_eq!(tree.node(root).children(), [x, y, z]);

        let w = artifact(&mut tree, DiffType::Added, "w");
        let err = tree.insert_child(root, w, 9, Time::After).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttachment {
                reason: AttachmentRejection::IndexOutOfBounds { index: 9, len: 3 },
                ..
            }
        ));
    }

    #[test]
    fn steal_children_moves_both_times() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let b = tree.create_if(DiffType::Unchanged, Formula::var("B"));
        tree.add_below(a, Some(root), Some(root)).unwrap();
        tree.add_below(b, Some(root), Some(root)).unwrap();

        let x = artifact(&mut tree, DiffType::Unchanged, "x");
        let y = artifact(&mut tree, DiffType::Removed, "y");
        tree.add_below(x, Some(a), Some(a)).unwrap();
        tree.add_below(y, Some(a), None).unwrap();

        tree.steal_children_of(b, a).unwrap();
        assert!(tree.node(a).children().is_empty());
        assert_eq!(tree.node(b).children(), [x, y]);
        assert_eq!(tree.parent(x, Time::After), Some(b));
        assert_eq!(tree.parent(y, Time::Before), Some(b));
        assert_eq!(tree.parent(y, Time::After), None);
    }

    #[test]
    fn steal_children_refuses_cycles() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        tree.add_below(a, Some(root), Some(root)).unwrap();

        assert!(tree.steal_children_of(a, root).is_err());
        assert_eq!(tree.parent(a, Time::Before), Some(root));
    }

    #[test]
    fn derived_queries() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let b = tree.create_if(DiffType::Added, Formula::var("B"));
        let e = tree.create_else(DiffType::Added);
        let x = artifact(&mut tree, DiffType::Unchanged, "x");
        tree.add_below(a, Some(root), Some(root)).unwrap();
        tree.add_below(b, None, Some(a)).unwrap();
        tree.add_below(e, None, Some(b)).unwrap();
        tree.add_below(x, Some(a), Some(e)).unwrap();

        assert_eq!(tree.depth(x, Time::Before).unwrap(), 2);
        assert_eq!(tree.depth(x, Time::After).unwrap(), 4);
        assert_eq!(tree.annotation_depth(x, Time::After).unwrap(), 2);
        assert_eq!(tree.change_amount(x, Time::After).unwrap(), 1);
        assert_eq!(tree.change_amount(x, Time::Before).unwrap(), 0);
        assert_eq!(tree.if_node(e, Time::After), Some(b));
        assert_eq!(tree.if_node(root, Time::After), None);
        assert_eq!(tree.enclosing_annotation(x, Time::After), Some(e));
        assert!(!tree.before_path_equals_after_path(x));
        assert!(tree.before_path_equals_after_path(a));
        assert!(tree.is_ancestor(b, x, Time::After));
        assert!(!tree.is_ancestor(b, x, Time::Before));

        assert!(matches!(
            tree.depth(b, Time::Before),
            Err(TreeError::NodeDoesNotExistAtTime { .. })
        ));
    }

    #[test]
    fn traversals_visit_moved_nodes_once() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let b = tree.create_if(DiffType::Unchanged, Formula::var("B"));
        let x = artifact(&mut tree, DiffType::Unchanged, "x");
        tree.add_below(a, Some(root), Some(root)).unwrap();
        tree.add_below(b, Some(root), Some(root)).unwrap();
        tree.add_below(x, Some(a), Some(b)).unwrap();

        assert_eq!(tree.preorder(), vec![root, a, x, b]);
        assert_eq!(tree.postorder(), vec![x, a, b, root]);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.artifact_nodes(), vec![x]);
        assert_eq!(tree.annotation_nodes(), vec![a, b]);
        assert!(tree.any_match(|_, n| n.label() == "x"));
        assert!(!tree.any_match(|_, n| n.is_removed()));
    }

    #[test]
    fn create_annotation_checks_formula() {
        let mut tree = VariationDiff::new();
        let line = LineNumber::INVALID;
        assert!(tree
            .create_annotation(DiffType::Added, NodeType::If, None, line, line, ["#if"])
            .is_err());
        assert!(tree
            .create_annotation(
                DiffType::Added,
                NodeType::Else,
                Some(Formula::var("A")),
                line,
                line,
                ["#else"]
            )
            .is_err());
        assert!(tree
            .create_annotation(DiffType::Added, NodeType::Root, None, line, line, [""])
            .is_err());
        let elif = tree
            .create_annotation(
                DiffType::Added,
                NodeType::Elif,
                Some(Formula::var("A")),
                line,
                line,
                ["#elif A"],
            )
            .unwrap();
        assert_eq!(tree.node(elif).direct_formula(), Some(&Formula::var("A")));
    }

    #[test]
    fn same_as_ignores_identities() {
        let build = |extra_first: bool| {
            let mut tree = VariationDiff::new();
            if extra_first {
                // detached node shifts every id
                artifact(&mut tree, DiffType::Added, "unused");
            }
            let root = tree.root();
            let a = tree.create_if(DiffType::Added, Formula::var("A"));
            let x = artifact(&mut tree, DiffType::Added, "x");
            tree.add_child(root, a, Time::After).unwrap();
            tree.add_child(a, x, Time::After).unwrap();
            tree
        };
        assert!(build(false).is_same_as(&build(true)));

        let mut other = build(false);
        let root = other.root();
        let y = artifact(&mut other, DiffType::Removed, "y");
        other.add_child(root, y, Time::Before).unwrap();
        assert!(!build(false).is_same_as(&other));
    }
}
