use proptest::prelude::*;
use vdiff_formula::{CachingOracle, Formula, FormulaOracle, SatOracle};

const VARS: [&str; 4] = ["A", "B", "C", "D"];

fn arb_formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        Just(Formula::True),
        Just(Formula::False),
        "[ABCD]".prop_map(Formula::Var),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| Formula::Not(Box::new(f))),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Formula::And),
            proptest::collection::vec(inner, 0..4).prop_map(Formula::Or),
        ]
    })
}

/// Reference answer by enumerating all assignments of `VARS`
fn brute_force_sat(f: &Formula) -> bool {
    (0u32..(1 << VARS.len())).any(|bits| {
        f.evaluate(&|name| {
            VARS.iter()
                .position(|v| *v == name)
                .is_some_and(|i| bits & (1 << i) != 0)
        })
    })
}

fn equivalent_by_truth_table(f: &Formula, g: &Formula) -> bool {
    (0u32..(1 << VARS.len())).all(|bits| {
        let assignment = |name: &str| {
            VARS.iter()
                .position(|v| *v == name)
                .is_some_and(|i| bits & (1 << i) != 0)
        };
        f.evaluate(&assignment) == g.evaluate(&assignment)
    })
}

proptest! {
    #[test]
    fn prop_sat_oracle_agrees_with_truth_table(f in arb_formula()) {
        let oracle = SatOracle::new();
        prop_assert_eq!(oracle.is_satisfiable(&f).unwrap(), brute_force_sat(&f));
    }

    #[test]
    fn prop_cached_oracle_agrees_with_solver(f in arb_formula()) {
        let cached = CachingOracle::new(SatOracle::new(), 64);
        let first = cached.is_satisfiable(&f).unwrap();
        let second = cached.is_satisfiable(&f).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, SatOracle::new().is_satisfiable(&f).unwrap());
    }

    #[test]
    fn prop_regular_cnf_preserves_semantics(f in arb_formula()) {
        if let Some(cnf) = f.to_regular_cnf(256) {
            prop_assert!(equivalent_by_truth_table(&f, &cnf.to_formula()));
        }
    }

    #[test]
    fn prop_eliminate_true_false_preserves_semantics(f in arb_formula()) {
        let simplified = f.eliminate_true_false();
        prop_assert!(equivalent_by_truth_table(&f, &simplified));
    }

    #[test]
    fn prop_negation_is_complement(f in arb_formula()) {
        let oracle = SatOracle::new();
        let neither = Formula::and([f.clone(), f.negate()]);
        prop_assert!(!oracle.is_satisfiable(&neither).unwrap());
        prop_assert!(oracle.is_tautology(&Formula::or([f.clone(), f.negate()])).unwrap());
    }
}

#[test]
fn equivalence_of_de_morgan_forms() {
    let oracle = SatOracle::new();
    let a = Formula::var("A");
    let b = Formula::var("B");
    let c = Formula::var("C");

    let lhs = Formula::and([a.clone(), Formula::or([b.clone(), c.clone()])]).negate();
    let rhs = Formula::or([a.negate(), Formula::and([b.negate(), c.negate()])]);
    assert!(oracle.equivalent(&lhs, &rhs).unwrap());
    assert!(!oracle.equivalent(&lhs, &a.negate()).unwrap());
}
