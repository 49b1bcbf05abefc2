//! Testing utilities for the VDiff workspace
//!
//! Shared fixtures, proptest generators, and oracles for failure injection.

#![allow(missing_docs)]

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use vdiff_formula::{Formula, FormulaOracle, OracleError};
use vdiff_tree::{DiffType, LineNumber, NodeId, NodeType, Time, VariationDiff};

pub fn var(name: &str) -> Formula {
    Formula::var(name)
}

pub fn artifact(tree: &mut VariationDiff, diff_type: DiffType, text: &str) -> NodeId {
    tree.create_artifact(diff_type, LineNumber::INVALID, LineNumber::INVALID, [text])
}

/// `#if A / a(); / #elif B / b(); / #else / c(); / #endif`, all unchanged
#[derive(Debug, Clone)]
pub struct IfElifElse {
    pub tree: VariationDiff,
    pub if_node: NodeId,
    pub elif_node: NodeId,
    pub else_node: NodeId,
    pub if_artifact: NodeId,
    pub elif_artifact: NodeId,
    pub else_artifact: NodeId,
}

pub fn if_elif_else(if_formula: Formula, elif_formula: Formula) -> IfElifElse {
    let mut tree = VariationDiff::new();
    let root = tree.root();
    let if_node = tree.create_if(DiffType::Unchanged, if_formula);
    let elif_node = tree.create_elif(DiffType::Unchanged, elif_formula);
    let else_node = tree.create_else(DiffType::Unchanged);
    let if_artifact = artifact(&mut tree, DiffType::Unchanged, "a();");
    let elif_artifact = artifact(&mut tree, DiffType::Unchanged, "b();");
    let else_artifact = artifact(&mut tree, DiffType::Unchanged, "c();");

    tree.add_below(if_node, Some(root), Some(root)).unwrap();
    tree.add_below(if_artifact, Some(if_node), Some(if_node)).unwrap();
    tree.add_below(elif_node, Some(if_node), Some(if_node)).unwrap();
    tree.add_below(elif_artifact, Some(elif_node), Some(elif_node)).unwrap();
    tree.add_below(else_node, Some(elif_node), Some(elif_node)).unwrap();
    tree.add_below(else_artifact, Some(else_node), Some(else_node)).unwrap();

    IfElifElse {
        tree,
        if_node,
        elif_node,
        else_node,
        if_artifact,
        elif_artifact,
        else_artifact,
    }
}

/// An `#else` with one new line added below an unedited `#if`
///
/// ```text
///  #if X
///  foo();
/// +#else
/// +bar();
/// +#endif
///  #endif
/// ```
#[derive(Debug, Clone)]
pub struct ElseAdded {
    pub tree: VariationDiff,
    pub if_node: NodeId,
    pub kept_artifact: NodeId,
    pub else_node: NodeId,
    pub added_artifact: NodeId,
}

pub fn else_added_under_unedited_if(feature: &str) -> ElseAdded {
    let mut tree = VariationDiff::new();
    let root = tree.root();
    let if_node = tree.create_if(DiffType::Unchanged, var(feature));
    let kept_artifact = artifact(&mut tree, DiffType::Unchanged, "foo();");
    let else_node = tree.create_else(DiffType::Added);
    let added_artifact = artifact(&mut tree, DiffType::Added, "bar();");

    tree.add_below(if_node, Some(root), Some(root)).unwrap();
    tree.add_below(kept_artifact, Some(if_node), Some(if_node)).unwrap();
    tree.add_below(else_node, None, Some(if_node)).unwrap();
    tree.add_below(added_artifact, None, Some(else_node)).unwrap();

    ElseAdded {
        tree,
        if_node,
        kept_artifact,
        else_node,
        added_artifact,
    }
}

/// An unedited `#if` whose enclosing `#if` is removed
///
/// ```text
/// -#if B
///  #if A
///  x();
///  #endif
/// -#endif
/// ```
#[derive(Debug, Clone)]
pub struct MovedAnnotation {
    pub tree: VariationDiff,
    pub removed_node: NodeId,
    pub moved_node: NodeId,
    pub kept_artifact: NodeId,
}

pub fn annotation_moved_out_of_removed_if() -> MovedAnnotation {
    let mut tree = VariationDiff::new();
    let root = tree.root();
    let removed_node = tree.create_if(DiffType::Removed, var("B"));
    let moved_node = tree.create_if(DiffType::Unchanged, var("A"));
    let kept_artifact = artifact(&mut tree, DiffType::Unchanged, "x();");

    tree.add_below(removed_node, Some(root), None).unwrap();
    tree.add_below(moved_node, Some(removed_node), Some(root)).unwrap();
    tree.add_below(kept_artifact, Some(moved_node), Some(moved_node)).unwrap();

    MovedAnnotation {
        tree,
        removed_node,
        moved_node,
        kept_artifact,
    }
}

/// A diff touching several features, one artifact per pattern
///
/// ```text
///  #if A
///  a();
/// -#if B
/// -b();
/// -#endif
/// +c();
///  #endif
/// +#if C
/// +d();
/// +#endif
/// ```
pub fn mixed_edit() -> VariationDiff {
    let mut tree = VariationDiff::new();
    let root = tree.root();
    let a = tree.create_if(DiffType::Unchanged, var("A"));
    let b = tree.create_if(DiffType::Removed, var("B"));
    let c = tree.create_if(DiffType::Added, var("C"));
    let kept = artifact(&mut tree, DiffType::Unchanged, "a();");
    let removed = artifact(&mut tree, DiffType::Removed, "b();");
    let added_to_pc = artifact(&mut tree, DiffType::Added, "c();");
    let added_with_mapping = artifact(&mut tree, DiffType::Added, "d();");

    tree.add_below(a, Some(root), Some(root)).unwrap();
    tree.add_below(kept, Some(a), Some(a)).unwrap();
    tree.add_below(b, Some(a), None).unwrap();
    tree.add_below(removed, Some(b), None).unwrap();
    tree.add_below(added_to_pc, None, Some(a)).unwrap();
    tree.add_below(c, None, Some(root)).unwrap();
    tree.add_below(added_with_mapping, None, Some(c)).unwrap();
    tree
}

#[derive(Debug, Clone)]
struct Step {
    node_type: NodeType,
    diff_type: DiffType,
    picks: [usize; 2],
    formula: Formula,
}

fn arb_small_formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")].prop_map(Formula::var);
    prop_oneof![
        3 => leaf.clone(),
        1 => leaf.clone().prop_map(|f| f.negate()),
        1 => (leaf.clone(), leaf.clone()).prop_map(|(a, b)| Formula::and([a, b])),
        1 => (leaf.clone(), leaf).prop_map(|(a, b)| Formula::or([a, b])),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    (
        prop_oneof![
            3 => Just(NodeType::Artifact),
            2 => Just(NodeType::If),
            1 => Just(NodeType::Elif),
            1 => Just(NodeType::Else),
        ],
        prop_oneof![
            1 => Just(DiffType::Added),
            1 => Just(DiffType::Removed),
            2 => Just(DiffType::Unchanged),
        ],
        any::<[usize; 2]>(),
        arb_small_formula(),
    )
        .prop_map(|(node_type, diff_type, picks, formula)| Step {
            node_type,
            diff_type,
            picks,
            formula,
        })
}

/// Grow a consistent diff, attaching every step as a fresh leaf
fn grow(steps: Vec<Step>) -> VariationDiff {
    let mut tree = VariationDiff::new();
    let mut annotations = vec![tree.root()];

    'steps: for step in steps {
        let chain_member = matches!(step.node_type, NodeType::Elif | NodeType::Else);
        let mut parents = [None, None];
        for (slot, time) in Time::ALL.into_iter().enumerate() {
            if !step.diff_type.exists_at_time(time) {
                continue;
            }
            let candidates: Vec<NodeId> = annotations
                .iter()
                .copied()
                .filter(|a| {
                    let node = tree.node(*a);
                    node.exists_at_time(time)
                        && (!chain_member || node.node_type().is_conditional_annotation())
                })
                .collect();
            if candidates.is_empty() {
                continue 'steps;
            }
            parents[slot] = Some(candidates[step.picks[slot] % candidates.len()]);
        }

        let id = match step.node_type {
            NodeType::If => tree.create_if(step.diff_type, step.formula),
            NodeType::Elif => tree.create_elif(step.diff_type, step.formula),
            NodeType::Else => tree.create_else(step.diff_type),
            _ => {
                let text = format!("line{}();", tree.arena_len());
                artifact(&mut tree, step.diff_type, &text)
            }
        };
        tree.add_below(id, parents[0], parents[1]).unwrap();
        if step.node_type != NodeType::Artifact {
            annotations.push(id);
        }
    }
    tree
}

/// Consistent diffs of up to `max_steps` nodes below the root
pub fn arb_diff(max_steps: usize) -> impl Strategy<Value = VariationDiff> {
    proptest::collection::vec(arb_step(), 0..max_steps).prop_map(grow)
}

/// Oracle that fails every query
#[derive(Debug, Default)]
pub struct FailingOracle {
    pub calls: AtomicUsize,
}

impl FormulaOracle for FailingOracle {
    fn is_satisfiable(&self, _formula: &Formula) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OracleError::Solver("injected failure".into()))
    }
}

/// Oracle decorator counting satisfiability queries
#[derive(Debug, Default)]
pub struct CountingOracle<O> {
    pub inner: O,
    calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<O: FormulaOracle> FormulaOracle for CountingOracle<O> {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.is_satisfiable(formula)
    }
}
