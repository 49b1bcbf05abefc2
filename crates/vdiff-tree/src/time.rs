//! Points in time, diff types and node types
//!
//! The closed vocabularies every variation diff is built from.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The two points in time a diff relates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Time {
    /// State before the edit
    Before,
    /// State after the edit
    After,
}

impl Time {
    /// Both times in order
    pub const ALL: [Time; 2] = [Time::Before, Time::After];

    /// The respective other time
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Time::Before => Time::After,
            Time::After => Time::Before,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Time::Before => 0,
            Time::After => 1,
        }
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Time::Before => write!(f, "before"),
            Time::After => write!(f, "after"),
        }
    }
}

/// Whether a node was added, removed or kept by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiffType {
    /// Exists only after the edit
    Added,
    /// Exists only before the edit
    Removed,
    /// Exists at both times
    Unchanged,
}

impl DiffType {
    /// Check if nodes of this type exist at the given time
    #[inline]
    #[must_use]
    pub fn exists_at_time(self, time: Time) -> bool {
        match self {
            DiffType::Unchanged => true,
            DiffType::Added => time == Time::After,
            DiffType::Removed => time == Time::Before,
        }
    }

    /// The diff type that exists exclusively at the given time
    #[inline]
    #[must_use]
    pub fn only_at(time: Time) -> Self {
        match time {
            Time::Before => DiffType::Removed,
            Time::After => DiffType::Added,
        }
    }

    /// Diff type of a node existing at exactly the given times
    ///
    /// Returns `None` if the node exists at neither time.
    #[inline]
    #[must_use]
    pub fn from_existence(before: bool, after: bool) -> Option<Self> {
        match (before, after) {
            (true, true) => Some(DiffType::Unchanged),
            (true, false) => Some(DiffType::Removed),
            (false, true) => Some(DiffType::Added),
            (false, false) => None,
        }
    }

    /// Line prefix in a unified diff
    #[inline]
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            DiffType::Added => '+',
            DiffType::Removed => '-',
            DiffType::Unchanged => ' ',
        }
    }
}

impl Display for DiffType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffType::Added => "added",
            DiffType::Removed => "removed",
            DiffType::Unchanged => "unchanged",
        };
        write!(f, "{name}")
    }
}

/// Kind of a node in a variation diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// The single root; a neutral annotation with formula `true`
    Root,
    /// `#if`, `#ifdef`, `#ifndef`
    If,
    /// `#elif`
    Elif,
    /// `#else`
    Else,
    /// Plain source lines
    Artifact,
}

impl NodeType {
    /// Check if this is an annotation (including the root)
    #[inline]
    #[must_use]
    pub fn is_annotation(self) -> bool {
        !matches!(self, NodeType::Artifact)
    }

    /// Check if this annotation carries its own formula
    #[inline]
    #[must_use]
    pub fn is_conditional_annotation(self) -> bool {
        matches!(self, NodeType::If | NodeType::Elif)
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Root => "root",
            NodeType::If => "if",
            NodeType::Elif => "elif",
            NodeType::Else => "else",
            NodeType::Artifact => "artifact",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_is_involution() {
        for t in Time::ALL {
            assert_ne!(t.other(), t);
            assert_eq!(t.other().other(), t);
        }
    }

    #[test]
    fn existence_table() {
        assert!(DiffType::Unchanged.exists_at_time(Time::Before));
        assert!(DiffType::Unchanged.exists_at_time(Time::After));
        assert!(DiffType::Added.exists_at_time(Time::After));
        assert!(!DiffType::Added.exists_at_time(Time::Before));
        assert!(DiffType::Removed.exists_at_time(Time::Before));
        assert!(!DiffType::Removed.exists_at_time(Time::After));
    }

    #[test]
    fn from_existence_inverts_exists_at_time() {
        for d in [DiffType::Added, DiffType::Removed, DiffType::Unchanged] {
            let back = DiffType::from_existence(
                d.exists_at_time(Time::Before),
                d.exists_at_time(Time::After),
            );
            assert_eq!(back, Some(d));
        }
        assert_eq!(DiffType::from_existence(false, false), None);
    }

    #[test]
    fn only_at_exists_only_then() {
        for t in Time::ALL {
            let d = DiffType::only_at(t);
            assert!(d.exists_at_time(t));
            assert!(!d.exists_at_time(t.other()));
        }
    }

    #[test]
    fn annotation_kinds() {
        assert!(NodeType::Root.is_annotation());
        assert!(NodeType::Else.is_annotation());
        assert!(!NodeType::Artifact.is_annotation());
        assert!(NodeType::Elif.is_conditional_annotation());
        assert!(!NodeType::Else.is_conditional_annotation());
        assert!(!NodeType::Root.is_conditional_annotation());
    }
}
