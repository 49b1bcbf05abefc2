//! View extraction
//!
//! A view keeps the nodes a [`Relevance`] selects at each time, together with
//! their ancestors, and re-labels them by where they survived: kept at both
//! times is unchanged, kept only before is removed, kept only after is added.
//! Both algorithms select the same nodes; the optimized one evaluates fewer
//! predicates.

use crate::error::ViewError;
use crate::relevance::{preorder_at, Relevance, ViewNodes};
use vdiff_formula::FormulaOracle;
use vdiff_tree::{DiffType, NodeId, Time, VariationDiff};

/// View computed by testing every node at every time it exists
pub fn naive_view<R>(tree: &VariationDiff, relevance: &R, oracle: &dyn FormulaOracle) -> Result<VariationDiff, ViewError>
where
    R: Relevance + ?Sized,
{
    let before = naive_view_nodes(tree, relevance, Time::Before, oracle)?;
    let after = naive_view_nodes(tree, relevance, Time::After, oracle)?;
    let view = build_view(tree, &before, &after)?;
    tracing::debug!(%relevance, nodes = view.node_count(), "built naive view");
    Ok(view)
}

/// View computed with [`Relevance::compute_view_nodes`]
pub fn optimized_view<R>(
    tree: &VariationDiff,
    relevance: &R,
    oracle: &dyn FormulaOracle,
) -> Result<VariationDiff, ViewError>
where
    R: Relevance + ?Sized,
{
    let before = relevance.compute_view_nodes(tree, Time::Before, oracle)?;
    let after = relevance.compute_view_nodes(tree, Time::After, oracle)?;
    let view = build_view(tree, &before, &after)?;
    tracing::debug!(%relevance, nodes = view.node_count(), "built optimized view");
    Ok(view)
}

/// View of the variation tree at `time`
///
/// All nodes of the result are unchanged.
pub fn view_tree<R>(
    tree: &VariationDiff,
    relevance: &R,
    time: Time,
    oracle: &dyn FormulaOracle,
) -> Result<VariationDiff, ViewError>
where
    R: Relevance + ?Sized,
{
    optimized_view(&tree.project(time)?, relevance, oracle)
}

fn naive_view_nodes<R>(
    tree: &VariationDiff,
    relevance: &R,
    time: Time,
    oracle: &dyn FormulaOracle,
) -> Result<ViewNodes, ViewError>
where
    R: Relevance + ?Sized,
{
    let mut view = ViewNodes::new(tree.arena_len());
    view.insert(tree.root());
    for id in preorder_at(tree, time) {
        if relevance.test(tree, id, time, oracle)? {
            view.insert(id);
        }
    }
    view.close_under_ancestors(tree, time);
    Ok(view)
}

/// Copy the selected nodes into a new diff
///
/// Each copy is attached below the copy of its parent at every time it was
/// selected for, keeping the original child order.
fn build_view(tree: &VariationDiff, before: &ViewNodes, after: &ViewNodes) -> Result<VariationDiff, ViewError> {
    let selected = |id: NodeId, time: Time| {
        let members = match time {
            Time::Before => before,
            Time::After => after,
        };
        members.contains(id) && tree.node(id).exists_at_time(time)
    };

    let mut view = VariationDiff::new();
    let mut copies: Vec<Option<NodeId>> = vec![None; tree.arena_len()];
    copies[tree.root().index()] = Some(view.root());

    let order = tree.preorder();
    for &id in &order {
        if id == tree.root() {
            continue;
        }
        let survived = DiffType::from_existence(selected(id, Time::Before), selected(id, Time::After));
        if let Some(diff_type) = survived {
            copies[id.index()] = Some(view.copy_node(tree.node(id), diff_type));
        }
    }

    for &parent in &order {
        let Some(parent_copy) = copies[parent.index()] else {
            continue;
        };
        for &child in tree.node(parent).children() {
            let Some(child_copy) = copies[child.index()] else {
                continue;
            };
            for time in Time::ALL {
                if selected(child, time) && tree.parent(child, time) == Some(parent) {
                    view.add_child(parent_copy, child_copy, time)?;
                }
            }
        }
    }

    debug_assert!(view.check_consistency().is_ok(), "view of a consistent diff");
    Ok(view)
}
