//! Edit pattern classification
//!
//! Added and removed artifacts are classified structurally. Unchanged
//! artifacts compare their presence conditions before and after the edit
//! with the oracle; syntactically equal conditions need no oracle call.

use crate::error::ClassifyError;
use crate::pattern::EditPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vdiff_formula::FormulaOracle;
use vdiff_tree::{DiffType, NodeId, Time, VariationDiff};

/// Determine the edit pattern of an artifact
///
/// Exactly one pattern is returned for every artifact. Oracle errors are
/// propagated, never read as a negative answer.
pub fn classify<O>(tree: &VariationDiff, node: NodeId, oracle: &O) -> Result<EditPattern, ClassifyError>
where
    O: FormulaOracle + ?Sized,
{
    let n = tree.get(node).ok_or(vdiff_tree::TreeError::UnknownNode(node))?;
    if !n.is_artifact() {
        return Err(ClassifyError::NotAnArtifact {
            node,
            node_type: n.node_type(),
        });
    }

    let pattern = match n.diff_type() {
        DiffType::Added => {
            if parent_has_type(tree, node, Time::After, DiffType::Added)? {
                EditPattern::AddWithMapping
            } else {
                EditPattern::AddToPC
            }
        }
        DiffType::Removed => {
            if parent_has_type(tree, node, Time::Before, DiffType::Removed)? {
                EditPattern::RemWithMapping
            } else {
                EditPattern::RemFromPC
            }
        }
        DiffType::Unchanged => {
            let pcb = tree.presence_condition(node, Time::Before)?;
            let pca = tree.presence_condition(node, Time::After)?;

            let (before_in_after, after_in_before) = if pcb == pca {
                (true, true)
            } else {
                (oracle.implies(&pcb, &pca)?, oracle.implies(&pca, &pcb)?)
            };

            match (before_in_after, after_in_before) {
                (true, true) if tree.before_path_equals_after_path(node) => EditPattern::Untouched,
                (true, true) => EditPattern::Refactoring,
                (true, false) => EditPattern::Generalization,
                (false, true) => EditPattern::Specialization,
                (false, false) => EditPattern::Reconfiguration,
            }
        }
    };

    tracing::trace!(%node, %pattern, "classified artifact");
    Ok(pattern)
}

fn parent_has_type(
    tree: &VariationDiff,
    node: NodeId,
    time: Time,
    diff_type: DiffType,
) -> Result<bool, ClassifyError> {
    let parent = tree
        .parent(node, time)
        .ok_or(vdiff_tree::TreeError::Detached { node, time })?;
    Ok(tree.node(parent).diff_type() == diff_type)
}

/// Check if `pattern` describes the edit of an artifact
///
/// Agrees with [`classify`]; patterns for a different diff type are
/// rejected without consulting the oracle.
pub fn matches<O>(
    pattern: EditPattern,
    tree: &VariationDiff,
    node: NodeId,
    oracle: &O,
) -> Result<bool, ClassifyError>
where
    O: FormulaOracle + ?Sized,
{
    let n = tree.get(node).ok_or(vdiff_tree::TreeError::UnknownNode(node))?;
    if n.is_artifact() && n.diff_type() != pattern.diff_type() {
        return Ok(false);
    }
    Ok(classify(tree, node, oracle)? == pattern)
}

/// Classify every reachable artifact in pre-order
pub fn classify_all<O>(tree: &VariationDiff, oracle: &O) -> Result<Vec<(NodeId, EditPattern)>, ClassifyError>
where
    O: FormulaOracle + ?Sized,
{
    tree.artifact_nodes()
        .into_iter()
        .map(|node| Ok((node, classify(tree, node, oracle)?)))
        .collect()
}

/// Number of artifacts per pattern within one diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCounts {
    counts: BTreeMap<EditPattern, usize>,
}

impl PatternCounts {
    /// Create empty counts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `pattern`
    pub fn record(&mut self, pattern: EditPattern) {
        *self.counts.entry(pattern).or_insert(0) += 1;
    }

    /// Occurrences of `pattern`
    #[inline]
    #[must_use]
    pub fn get(&self, pattern: EditPattern) -> usize {
        self.counts.get(&pattern).copied().unwrap_or(0)
    }

    /// Total number of classified artifacts
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Patterns with at least one occurrence, in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = (EditPattern, usize)> + '_ {
        self.counts.iter().map(|(p, c)| (*p, *c))
    }
}

impl FromIterator<EditPattern> for PatternCounts {
    fn from_iter<I: IntoIterator<Item = EditPattern>>(iter: I) -> Self {
        let mut counts = Self::new();
        for pattern in iter {
            counts.record(pattern);
        }
        counts
    }
}

impl<'a> FromIterator<&'a (NodeId, EditPattern)> for PatternCounts {
    fn from_iter<I: IntoIterator<Item = &'a (NodeId, EditPattern)>>(iter: I) -> Self {
        iter.into_iter().map(|(_, p)| *p).collect()
    }
}
