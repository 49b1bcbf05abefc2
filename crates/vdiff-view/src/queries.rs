//! Built-in relevance predicates

use crate::error::ViewError;
use crate::relevance::{Relevance, ViewNodes};
use std::fmt::{self, Display, Formatter};
use vdiff_formula::{Formula, FormulaOracle};
use vdiff_tree::{NodeId, NodeType, Time, VariationDiff};

/// Nodes whose feature mapping mentions a feature
///
/// The root has no feature mapping and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trace {
    feature: String,
}

impl Trace {
    /// Trace `feature`
    #[must_use]
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
        }
    }

    /// Traced feature
    #[inline]
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "trace({})", self.feature)
    }
}

impl Relevance for Trace {
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        time: Time,
        _oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError> {
        if tree.node(node).is_root() {
            return Ok(false);
        }
        Ok(tree
            .feature_mapping_clauses(node, time)?
            .iter()
            .any(|clause| clause.contains_variable(&self.feature)))
    }
}

/// Nodes present in some variant of a partial configuration
///
/// A node is relevant if the configuration and its presence condition are
/// satisfiable together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configure {
    configuration: Formula,
}

impl Configure {
    /// Restrict views to variants satisfying `configuration`
    #[must_use]
    pub fn new(configuration: Formula) -> Self {
        Self { configuration }
    }

    /// The partial configuration
    #[inline]
    #[must_use]
    pub fn configuration(&self) -> &Formula {
        &self.configuration
    }
}

impl Display for Configure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "configure({})", self.configuration)
    }
}

impl Relevance for Configure {
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError> {
        let pc = tree.presence_condition(node, time)?;
        Ok(oracle.is_satisfiable(&Formula::and([self.configuration.clone(), pc]))?)
    }

    /// Top-down selection
    ///
    /// Every node below an unsatisfiable node is unsatisfiable too, except
    /// the `#elif`/`#else` continuing its chain, so only those are visited.
    fn compute_view_nodes(
        &self,
        tree: &VariationDiff,
        time: Time,
        oracle: &dyn FormulaOracle,
    ) -> Result<ViewNodes, ViewError> {
        let root = tree.root();
        let mut view = ViewNodes::new(tree.arena_len());
        view.insert(root);

        let mut stack: Vec<NodeId> = tree.children_at(root, time).collect();
        let mut pruned = 0_usize;
        while let Some(id) = stack.pop() {
            if self.test(tree, id, time, oracle)? {
                view.insert(id);
                stack.extend(tree.children_at(id, time));
            } else {
                let before = stack.len();
                stack.extend(tree.children_at(id, time).filter(|child| {
                    matches!(tree.node(*child).node_type(), NodeType::Elif | NodeType::Else)
                }));
                pruned += tree.children_at(id, time).count() - (stack.len() - before);
            }
        }
        view.close_under_ancestors(tree, time);

        tracing::trace!(relevance = %self, %time, selected = view.len(), pruned, "configured view nodes");
        Ok(view)
    }
}

/// Artifacts whose text contains a string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Search {
    text: String,
}

impl Search {
    /// Search for `text`
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Display for Search {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "search({})", self.text)
    }
}

impl Relevance for Search {
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        _time: Time,
        _oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError> {
        let node = tree.node(node);
        Ok(node.is_artifact() && node.label().contains(&self.text))
    }
}

/// Artifacts with a line reading exactly a name, ignoring surrounding
/// whitespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    name: String,
}

impl ArtifactName {
    /// Select artifacts named `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Display for ArtifactName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "artifact({})", self.name)
    }
}

impl Relevance for ArtifactName {
    fn test(
        &self,
        tree: &VariationDiff,
        node: NodeId,
        _time: Time,
        _oracle: &dyn FormulaOracle,
    ) -> Result<bool, ViewError> {
        let node = tree.node(node);
        Ok(node.is_artifact() && node.label_lines().iter().any(|line| line.trim() == self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdiff_formula::SatOracle;
    use vdiff_tree::{DiffType, LineNumber};

    fn v(name: &str) -> Formula {
        Formula::var(name)
    }

    /// `#if A / a(); / #else / b(); / #endif` with `  c();  ` below the root
    fn chain() -> (VariationDiff, [NodeId; 5]) {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let if_node = tree.create_if(DiffType::Unchanged, v("A"));
        let else_node = tree.create_else(DiffType::Unchanged);
        let a = tree.create_artifact(DiffType::Unchanged, LineNumber::INVALID, LineNumber::INVALID, ["a();"]);
        let b = tree.create_artifact(DiffType::Unchanged, LineNumber::INVALID, LineNumber::INVALID, ["b();"]);
        let c = tree.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["  c();  "]);
        tree.add_below(if_node, Some(root), Some(root)).unwrap();
        tree.add_below(a, Some(if_node), Some(if_node)).unwrap();
        tree.add_below(else_node, Some(if_node), Some(if_node)).unwrap();
        tree.add_below(b, Some(else_node), Some(else_node)).unwrap();
        tree.add_below(c, None, Some(root)).unwrap();
        (tree, [if_node, else_node, a, b, c])
    }

    #[test]
    fn trace_follows_feature_mappings() {
        let (tree, [if_node, else_node, a, b, c]) = chain();
        let oracle = SatOracle::new();
        let trace = Trace::new("A");
        for id in [if_node, else_node, a, b] {
            assert!(trace.test(&tree, id, Time::After, &oracle).unwrap(), "{id}");
        }
        assert!(!trace.test(&tree, c, Time::After, &oracle).unwrap());
        assert!(!trace.test(&tree, tree.root(), Time::After, &oracle).unwrap());
        assert!(!Trace::new("B").test(&tree, a, Time::Before, &oracle).unwrap());
    }

    #[test]
    fn trace_rejects_absent_nodes() {
        let (tree, [.., c]) = chain();
        let err = Trace::new("A")
            .test(&tree, c, Time::Before, &SatOracle::new())
            .unwrap_err();
        assert!(matches!(err, ViewError::Tree(_)));
    }

    #[test]
    fn configure_prunes_but_follows_chains() {
        let (tree, [if_node, else_node, a, b, c]) = chain();
        let oracle = SatOracle::new();

        let not_a = Configure::new(v("A").negate());
        let nodes = not_a.compute_view_nodes(&tree, Time::After, &oracle).unwrap();
        assert!(nodes.contains(else_node) && nodes.contains(b) && nodes.contains(c));
        assert!(nodes.contains(if_node), "ancestor of the selected else");
        assert!(!nodes.contains(a));

        let only_a = Configure::new(v("A"));
        let nodes = only_a.compute_view_nodes(&tree, Time::Before, &oracle).unwrap();
        assert!(nodes.contains(a));
        assert!(!nodes.contains(else_node) && !nodes.contains(b) && !nodes.contains(c));
    }

    #[test]
    fn text_queries_only_match_artifacts() {
        let (tree, [if_node, _, a, b, c]) = chain();
        let oracle = SatOracle::new();
        assert!(Search::new("a(").test(&tree, a, Time::After, &oracle).unwrap());
        assert!(!Search::new("a(").test(&tree, b, Time::After, &oracle).unwrap());
        assert!(!Search::new("#if").test(&tree, if_node, Time::After, &oracle).unwrap());

        assert!(ArtifactName::new("c();").test(&tree, c, Time::After, &oracle).unwrap());
        assert!(!ArtifactName::new("c()").test(&tree, c, Time::After, &oracle).unwrap());
    }

    #[test]
    fn display_names_the_query() {
        assert_eq!(Trace::new("A").to_string(), "trace(A)");
        assert_eq!(Configure::new(v("A").negate()).to_string(), "configure(¬A)");
        assert_eq!(Search::new("foo").to_string(), "search(foo)");
        assert_eq!(ArtifactName::new("bar").to_string(), "artifact(bar)");
    }
}
