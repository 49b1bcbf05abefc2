//! Feature mappings and presence conditions
//!
//! The feature mapping of a node is the condition its own annotation imposes;
//! the presence condition conjoins the feature mappings of all enclosing
//! annotations. Both depend on the time they are asked for because a node
//! may sit below different annotations before and after an edit.
//!
//! Conditions are returned as clause lists whose conjunction is the
//! condition. Presence condition clauses are ordered outermost annotation
//! first; the root's neutral `true` is omitted, so a node directly below the
//! root has no clauses.

use crate::error::TreeError;
use crate::node::NodeId;
use crate::time::{NodeType, Time};
use crate::tree::VariationDiff;
use vdiff_formula::Formula;

impl VariationDiff {
    /// Clauses of the feature mapping of `id` at `time`
    ///
    /// - `If`: its formula
    /// - `Elif`: its formula and the negations of every earlier branch
    /// - `Else`: the negations of every earlier branch
    /// - artifact: the feature mapping of its annotation; `true` below the root
    pub fn feature_mapping_clauses(&self, id: NodeId, time: Time) -> Result<Vec<Formula>, TreeError> {
        let node = self.require_existence(id, time)?;
        if node.is_root() {
            return Err(TreeError::UndefinedForRoot);
        }

        let mut annotation = id;
        while self.node(annotation).is_artifact() {
            annotation = self.parent_at(annotation, time)?;
        }

        let mut clauses = Vec::new();
        match self.node(annotation).node_type() {
            NodeType::Root => clauses.push(Formula::True),
            NodeType::If => clauses.push(self.conditional_formula(annotation)?.clone()),
            NodeType::Elif => {
                clauses.push(self.conditional_formula(annotation)?.clone());
                self.negate_earlier_branches(annotation, time, &mut clauses)?;
            }
            NodeType::Else => {
                self.negate_earlier_branches(annotation, time, &mut clauses)?;
            }
            NodeType::Artifact => unreachable!("loop above skips artifacts"),
        }
        Ok(clauses)
    }

    /// Feature mapping of `id` at `time` as a single conjunction
    pub fn feature_mapping(&self, id: NodeId, time: Time) -> Result<Formula, TreeError> {
        self.feature_mapping_clauses(id, time).map(Formula::and)
    }

    /// Clauses of the presence condition of `id` at `time`, outermost first
    pub fn presence_condition_clauses(&self, id: NodeId, time: Time) -> Result<Vec<Formula>, TreeError> {
        self.require_existence(id, time)?;

        // collected innermost first, one entry per enclosing annotation
        let mut levels: Vec<Vec<Formula>> = Vec::new();
        let mut current = id;
        loop {
            let node = self.node(current);
            match node.node_type() {
                NodeType::Root => break,
                NodeType::Artifact => current = self.parent_at(current, time)?,
                NodeType::If => {
                    levels.push(vec![self.conditional_formula(current)?.clone()]);
                    current = self.parent_at(current, time)?;
                }
                NodeType::Elif | NodeType::Else => {
                    let mut clauses = Vec::new();
                    if node.is_elif() {
                        clauses.push(self.conditional_formula(current)?.clone());
                    }
                    let head = self.negate_earlier_branches(current, time, &mut clauses)?;
                    levels.push(clauses);
                    current = self.parent_at(head, time)?;
                }
            }
        }

        levels.reverse();
        Ok(levels.concat())
    }

    /// Presence condition of `id` at `time` as a single conjunction
    ///
    /// `true` for the root and for nodes directly below it.
    pub fn presence_condition(&self, id: NodeId, time: Time) -> Result<Formula, TreeError> {
        self.presence_condition_clauses(id, time).map(Formula::and)
    }

    /// Push the negated formulas of the branches preceding `branch` in its
    /// chain, nearest first, and return the chain's `If`
    fn negate_earlier_branches(
        &self,
        branch: NodeId,
        time: Time,
        clauses: &mut Vec<Formula>,
    ) -> Result<NodeId, TreeError> {
        let mut ancestor = self.parent_at(branch, time)?;
        loop {
            let node = self.node(ancestor);
            match node.node_type() {
                NodeType::If => {
                    clauses.push(self.conditional_formula(ancestor)?.negate());
                    return Ok(ancestor);
                }
                NodeType::Elif => {
                    clauses.push(self.conditional_formula(ancestor)?.negate());
                    ancestor = self.parent_at(ancestor, time)?;
                }
                found => {
                    return Err(TreeError::BrokenChain {
                        node: branch,
                        ancestor,
                        found,
                        time,
                    })
                }
            }
        }
    }

    fn conditional_formula(&self, id: NodeId) -> Result<&Formula, TreeError> {
        let node = self.node(id);
        node.direct_formula().ok_or(TreeError::InvalidAnnotation {
            node_type: node.node_type(),
            reason: "missing formula",
        })
    }
}
