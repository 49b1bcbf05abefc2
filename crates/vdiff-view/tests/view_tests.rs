use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vdiff_formula::{Formula, FormulaOracle, SatOracle};
use vdiff_test_utils::{arb_diff, artifact, else_added_under_unedited_if, mixed_edit, var, FailingOracle};
use vdiff_tree::{DiffType, NodeType, VariationDiff};
use vdiff_view::{
    naive_view, optimized_view, unique_partial_configs, unique_views, ArtifactName, Configure,
    EnumerationLimits, Relevance, Search, Trace, ViewError,
};

fn queries() -> Vec<Box<dyn Relevance>> {
    vec![
        Box::new(Trace::new("A")),
        Box::new(Trace::new("C")),
        Box::new(Configure::new(var("A"))),
        Box::new(Configure::new(var("B").negate())),
        Box::new(Configure::new(Formula::and([var("A"), var("C").negate()]))),
        Box::new(Search::new("line1")),
        Box::new(ArtifactName::new("line3();")),
    ]
}

proptest! {
    #[test]
    fn prop_naive_and_optimized_views_agree(tree in arb_diff(16)) {
        let oracle = SatOracle::new();
        for query in queries() {
            let naive = naive_view(&tree, query.as_ref(), &oracle).unwrap();
            let optimized = optimized_view(&tree, query.as_ref(), &oracle).unwrap();
            prop_assert!(naive.check_consistency().is_ok(), "{}", query);
            prop_assert!(optimized.check_consistency().is_ok(), "{}", query);
            prop_assert!(naive.is_same_as(&optimized), "{}", query);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_unique_configs_are_sound(tree in arb_diff(8)) {
        let oracle = SatOracle::new();
        let limits = EnumerationLimits::unlimited().with_max_iterations(4096);
        let configs = match unique_partial_configs(&tree, &oracle, &limits) {
            Err(err) if err.is_recoverable() => return Ok(()),
            other => other.unwrap(),
        };

        prop_assert!(!configs.is_empty());
        for (i, config) in configs.iter().enumerate() {
            prop_assert!(oracle.is_satisfiable(config).unwrap(), "{}", config);
            for later in &configs[i + 1..] {
                prop_assert!(!oracle.equivalent(config, later).unwrap(), "{} ≡ {}", config, later);
            }
        }
    }
}

#[test]
fn configuring_away_the_if_branch_keeps_the_added_else() {
    let fixture = else_added_under_unedited_if("X");
    let view = optimized_view(&fixture.tree, &Configure::new(var("X").negate()), &SatOracle::new()).unwrap();
    view.assert_consistency();

    let kept: Vec<(NodeType, String)> = view
        .preorder()
        .into_iter()
        .map(|id| (view.node(id).node_type(), view.node(id).label()))
        .collect();
    assert_eq!(
        kept,
        vec![
            (NodeType::Root, String::new()),
            (NodeType::If, "#if X".to_owned()),
            (NodeType::Else, "#else".to_owned()),
            (NodeType::Artifact, "bar();".to_owned()),
        ]
    );
    assert!(view.is_same_as(
        &naive_view(&fixture.tree, &Configure::new(var("X").negate()), &SatOracle::new()).unwrap()
    ));
}

#[test]
fn tracing_a_removed_feature_shows_only_the_old_code() {
    let tree = mixed_edit();
    let view = optimized_view(&tree, &Trace::new("B"), &SatOracle::new()).unwrap();
    assert_eq!(view.to_text_diff(), "-#if A\n-#if B\n-b();\n-#endif\n-#endif\n");
}

#[test]
fn unique_views_of_mixed_edit_hide_each_edit() {
    let tree = mixed_edit();
    let views = unique_views(&tree, &SatOracle::new(), &EnumerationLimits::unlimited()).unwrap();

    let (first_config, everything) = &views[0];
    assert_eq!(*first_config, Formula::True);
    assert!(everything.is_same_as(&tree));

    for (config, view) in &views {
        view.assert_consistency();
        assert!(view.node_count() <= tree.node_count(), "{config}");
    }
    assert!(views.iter().any(|(_, view)| view.node_count() < tree.node_count()));
}

#[test]
fn too_many_conditions_is_recoverable() {
    let mut tree = VariationDiff::new();
    let root = tree.root();
    for i in 0..usize::BITS {
        let annotation = tree.create_if(DiffType::Added, var(&format!("F{i}")));
        let line = artifact(&mut tree, DiffType::Added, "x();");
        tree.add_below(annotation, None, Some(root)).unwrap();
        tree.add_below(line, None, Some(annotation)).unwrap();
    }

    let err = unique_partial_configs(&tree, &SatOracle::new(), &EnumerationLimits::unlimited()).unwrap_err();
    let bits = usize::BITS as usize;
    assert_eq!(
        err,
        ViewError::TooManyDistinctConditions {
            count: bits,
            max: bits - 1
        }
    );
    assert!(err.is_recoverable());
}

#[test]
fn oracle_failures_propagate() {
    let tree = mixed_edit();
    let oracle = FailingOracle::default();

    let err = optimized_view(&tree, &Configure::new(var("A")), &oracle).unwrap_err();
    assert!(matches!(err, ViewError::Oracle(_)));
    assert!(!err.is_recoverable());

    let err = naive_view(&tree, &Configure::new(var("A")), &oracle).unwrap_err();
    assert!(matches!(err, ViewError::Oracle(_)));

    let err = unique_partial_configs(&tree, &oracle, &EnumerationLimits::unlimited()).unwrap_err();
    assert!(matches!(err, ViewError::Oracle(_) | ViewError::Classify(_)));
    assert!(!err.is_recoverable());

    // queries that never ask the oracle still work
    assert!(optimized_view(&tree, &Search::new("b();"), &oracle).is_ok());
}
