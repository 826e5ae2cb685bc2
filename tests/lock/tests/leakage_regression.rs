//! Flux leakage oracle lock tests: regression value on the pinned toy
//! network, plus sign, disjointness and determinism over random cores.

use std::collections::BTreeSet;

use lftc_harness::worlds::toy_central_carbon;
use lftc_search::oracle::flux_leakage;
use lftc_search::{CurrencyMetabolites, SearchError};
use proptest::prelude::*;

const REL_TOL: f64 = 1e-6;

#[test]
fn pinned_glycolysis_tca_core_regression() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let core = toy_central_carbon::glycolysis_tca_core();
    let result = flux_leakage(&core, &net, &CurrencyMetabolites::default()).unwrap();

    let expected = toy_central_carbon::GLYCOLYSIS_TCA_LEAKAGE;
    assert!(
        ((result.leakage() - expected) / expected).abs() < REL_TOL,
        "leakage {} != {expected}",
        result.leakage()
    );
    assert_eq!(result.producing().len(), 1);
    assert_eq!(result.consuming().len(), 1);
    assert!((result.producing()["PPC"] - 1.0).abs() < REL_TOL);
    assert!(result.consuming()["ACKr"].abs() < REL_TOL);
}

#[test]
fn absorbing_ppc_closes_the_leak() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut core = toy_central_carbon::glycolysis_tca_core();
    core.insert("PPC".to_string());
    let result = flux_leakage(&core, &net, &CurrencyMetabolites::default()).unwrap();
    assert!(result.leakage().abs() < REL_TOL);
    assert!(result.producing().is_empty());
}

#[test]
fn limits_reproduce_the_leak() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let core = toy_central_carbon::glycolysis_tca_core();
    let result = flux_leakage(&core, &net, &CurrencyMetabolites::default()).unwrap();
    let limited = result.apply_limits(&net).unwrap();
    let (_, ppc_upper) = limited.bounds("PPC").unwrap();
    assert!((ppc_upper - 1.0).abs() < REL_TOL);
    let (acetate_lower, _) = limited.bounds("ACKr").unwrap();
    assert!(acetate_lower.abs() < REL_TOL);
    // Still solvable under its own limits, with the same leakage.
    let again = flux_leakage(&core, &limited, &CurrencyMetabolites::default()).unwrap();
    assert!((again.leakage() - result.leakage()).abs() < REL_TOL);
}

#[test]
fn repeated_evaluation_is_identical() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let core = toy_central_carbon::glycolysis_tca_core();
    let currency = CurrencyMetabolites::default();
    let first = flux_leakage(&core, &net, &currency).unwrap();
    for _ in 0..5 {
        assert_eq!(flux_leakage(&core, &net, &currency).unwrap(), first);
    }
}

#[test]
fn starved_network_is_infeasible() {
    let mut net = toy_central_carbon::fixed_growth_network().unwrap();
    net.set_bounds(toy_central_carbon::FEED, 0.0, 0.0).unwrap();
    let err = flux_leakage(
        &toy_central_carbon::glycolysis_tca_core(),
        &net,
        &CurrencyMetabolites::default(),
    )
    .unwrap_err();
    assert_eq!(err, SearchError::Infeasible);
}

fn cores() -> impl Strategy<Value = BTreeSet<String>> {
    let ids: Vec<String> = toy_central_carbon::network()
        .unwrap()
        .reaction_ids()
        .map(ToString::to_string)
        .collect();
    proptest::collection::btree_set(proptest::sample::select(ids), 1..=12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn leakage_is_nonnegative_and_outside_the_core(core in cores()) {
        let net = toy_central_carbon::fixed_growth_network().unwrap();
        let result = flux_leakage(&core, &net, &CurrencyMetabolites::default()).unwrap();
        prop_assert!(result.leakage() >= 0.0);
        prop_assert!(result.producing().values().all(|f| *f >= 0.0));
        prop_assert!(result.consuming().values().all(|f| *f <= 0.0));
        prop_assert!(result.boundary_reactions().is_disjoint(&core));
    }
}
