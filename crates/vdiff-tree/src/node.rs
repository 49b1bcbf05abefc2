//! Nodes of a variation diff
//!
//! A [`DiffNode`] lives in the arena of its [`VariationDiff`](crate::VariationDiff)
//! and is addressed by a [`NodeId`]. Parent links are kept per [`Time`]; the
//! child list is shared between both times and ordered by insertion.

use crate::lines::{range_at_time, range_in_diff, LineNumber};
use crate::time::{DiffType, NodeType, Time};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;
use vdiff_formula::Formula;

/// Handle of a node within one variation diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// # Panics
    ///
    /// Panics if `index` does not fit a `u32`.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("variation diff arena holds at most u32::MAX nodes"))
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Children = SmallVec<[NodeId; 4]>;

/// A single annotation or artifact together with its edit information
#[derive(Debug, Clone)]
pub struct DiffNode {
    diff_type: DiffType,
    node_type: NodeType,
    from: LineNumber,
    to: LineNumber,
    formula: Option<Formula>,
    label: Vec<String>,
    parents: [Option<NodeId>; 2],
    children: Children,
}

impl DiffNode {
    pub(crate) fn new(
        diff_type: DiffType,
        node_type: NodeType,
        from: LineNumber,
        to: LineNumber,
        formula: Option<Formula>,
        label: Vec<String>,
    ) -> Self {
        Self {
            diff_type,
            node_type,
            from: from.restricted_to(diff_type),
            to: to.restricted_to(diff_type),
            formula,
            label,
            parents: [None, None],
            children: SmallVec::new(),
        }
    }

    /// Whether the node was added, removed or kept
    #[inline]
    #[must_use]
    pub fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    /// Kind of the node
    #[inline]
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Formula written in the annotation itself
    ///
    /// Present exactly for `If` and `Elif` nodes.
    #[inline]
    #[must_use]
    pub fn direct_formula(&self) -> Option<&Formula> {
        self.formula.as_ref()
    }

    /// Source lines of the node
    #[inline]
    #[must_use]
    pub fn label_lines(&self) -> &[String] {
        &self.label
    }

    /// Source lines joined by line breaks
    #[must_use]
    pub fn label(&self) -> String {
        self.label.join("\n")
    }

    /// Replace the source lines
    pub fn set_label(&mut self, label: &str) {
        self.label = label.lines().map(str::to_owned).collect();
    }

    /// Append a source line
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.label.push(line.into());
    }

    /// First line of the node
    #[inline]
    #[must_use]
    pub fn from_line(&self) -> LineNumber {
        self.from
    }

    /// Line after the last line of the node
    #[inline]
    #[must_use]
    pub fn to_line(&self) -> LineNumber {
        self.to
    }

    /// Set the first line, dropping coordinates at times the node is absent
    pub fn set_from_line(&mut self, from: LineNumber) {
        self.from = from.restricted_to(self.diff_type);
    }

    /// Set the end line, dropping coordinates at times the node is absent
    pub fn set_to_line(&mut self, to: LineNumber) {
        self.to = to.restricted_to(self.diff_type);
    }

    /// Lines spanned in the diff text
    #[inline]
    #[must_use]
    pub fn lines_in_diff(&self) -> Option<Range<u32>> {
        range_in_diff(&self.from, &self.to)
    }

    /// Lines spanned in the file version at `time`
    #[inline]
    #[must_use]
    pub fn lines_at_time(&self, time: Time) -> Option<Range<u32>> {
        range_at_time(&self.from, &self.to, time)
    }

    /// Parent at `time`, if any
    #[inline]
    #[must_use]
    pub fn parent(&self, time: Time) -> Option<NodeId> {
        self.parents[time.index()]
    }

    /// Children at either time in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if the node exists at `time`
    #[inline]
    #[must_use]
    pub fn exists_at_time(&self, time: Time) -> bool {
        self.diff_type.exists_at_time(time)
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node_type == NodeType::Root
    }

    #[inline]
    #[must_use]
    pub fn is_if(&self) -> bool {
        self.node_type == NodeType::If
    }

    #[inline]
    #[must_use]
    pub fn is_elif(&self) -> bool {
        self.node_type == NodeType::Elif
    }

    #[inline]
    #[must_use]
    pub fn is_else(&self) -> bool {
        self.node_type == NodeType::Else
    }

    #[inline]
    #[must_use]
    pub fn is_artifact(&self) -> bool {
        self.node_type == NodeType::Artifact
    }

    #[inline]
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.node_type.is_annotation()
    }

    #[inline]
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.diff_type == DiffType::Added
    }

    #[inline]
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.diff_type == DiffType::Removed
    }

    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.diff_type == DiffType::Unchanged
    }

    /// Compare everything except tree links
    #[must_use]
    pub fn same_content(&self, other: &DiffNode) -> bool {
        self.diff_type == other.diff_type
            && self.node_type == other.node_type
            && self.from == other.from
            && self.to == other.to
            && self.formula == other.formula
            && self.label == other.label
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, time: Time, parent: Option<NodeId>) {
        self.parents[time.index()] = parent;
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }
}

impl Display for DiffNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.formula {
            Some(formula) => write!(f, "{} {} {}", self.diff_type, self.node_type, formula),
            None if self.is_artifact() => {
                write!(f, "{} {} {:?}", self.diff_type, self.node_type, self.label())
            }
            None => write!(f, "{} {}", self.diff_type, self.node_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_follow_diff_type() {
        let mut node = DiffNode::new(
            DiffType::Added,
            NodeType::Artifact,
            LineNumber::new(2, 2, 2),
            LineNumber::new(3, 3, 3),
            None,
            vec!["foo();".into()],
        );
        assert_eq!(node.from_line().before, None);
        assert_eq!(node.lines_at_time(Time::After), Some(2..3));
        assert_eq!(node.lines_at_time(Time::Before), None);

        node.set_to_line(LineNumber::new(5, 5, 5));
        assert_eq!(node.to_line().before, None);
        assert_eq!(node.lines_in_diff(), Some(2..5));
    }

    #[test]
    fn label_round_trips_through_lines() {
        let mut node = DiffNode::new(
            DiffType::Unchanged,
            NodeType::Artifact,
            LineNumber::INVALID,
            LineNumber::INVALID,
            None,
            Vec::new(),
        );
        node.set_label("a\nb");
        node.push_line("c");
        assert_eq!(node.label_lines(), ["a", "b", "c"]);
        assert_eq!(node.label(), "a\nb\nc");
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::from_index(7).to_string(), "#7");
        assert_eq!(NodeId::from_index(7).index(), 7);
    }

    #[test]
    fn node_id_keeps_largest_index() {
        let last = u32::MAX as usize;
        assert_eq!(NodeId::from_index(last).index(), last);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "arena holds at most")]
    fn node_id_past_arena_capacity_panics() {
        let _ = NodeId::from_index(u32::MAX as usize + 1);
    }
}
