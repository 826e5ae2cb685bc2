//! Connectivity explorer lock tests: closure properties over random
//! candidate sets of the toy central carbon network.

use std::collections::BTreeSet;

use lftc_harness::worlds::toy_central_carbon;
use lftc_search::connectivity::{connected_subset, is_connected};
use lftc_search::CurrencyMetabolites;
use proptest::prelude::*;

fn reaction_ids() -> Vec<String> {
    toy_central_carbon::network()
        .unwrap()
        .reaction_ids()
        .map(ToString::to_string)
        .collect()
}

fn candidate_sets() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(proptest::sample::select(reaction_ids()), 0..=12)
}

proptest! {
    #[test]
    fn closure_is_idempotent(candidates in candidate_sets()) {
        let net = toy_central_carbon::network().unwrap();
        let currency = CurrencyMetabolites::default();
        let once = connected_subset(&candidates, toy_central_carbon::FEED, &currency, &net).unwrap();
        let twice = connected_subset(&once, toy_central_carbon::FEED, &currency, &net).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(is_connected(&once, toy_central_carbon::FEED, &currency, &net).unwrap());
    }

    #[test]
    fn closure_is_a_subset_of_candidates(candidates in candidate_sets()) {
        let net = toy_central_carbon::network().unwrap();
        let currency = CurrencyMetabolites::default();
        let closure = connected_subset(&candidates, toy_central_carbon::FEED, &currency, &net).unwrap();
        prop_assert!(closure.is_subset(&candidates));
    }

    #[test]
    fn more_currency_never_connects_more(candidates in candidate_sets()) {
        let net = toy_central_carbon::network().unwrap();
        let fewer = connected_subset(
            &candidates,
            toy_central_carbon::FEED,
            &CurrencyMetabolites::empty(),
            &net,
        )
        .unwrap();
        let more = connected_subset(
            &candidates,
            toy_central_carbon::FEED,
            &CurrencyMetabolites::default(),
            &net,
        )
        .unwrap();
        prop_assert!(more.is_subset(&fewer));
    }
}

#[test]
fn glycolysis_tca_core_is_connected() {
    let net = toy_central_carbon::network().unwrap();
    let core = toy_central_carbon::glycolysis_tca_core();
    assert!(is_connected(&core, toy_central_carbon::FEED, &CurrencyMetabolites::default(), &net).unwrap());
}

#[test]
fn acetate_transport_alone_is_unreachable() {
    let net = toy_central_carbon::network().unwrap();
    let mut core = toy_central_carbon::glycolysis_tca_core();
    core.insert("ACt".to_string());
    let closure =
        connected_subset(&core, toy_central_carbon::FEED, &CurrencyMetabolites::default(), &net).unwrap();
    assert_eq!(closure, toy_central_carbon::glycolysis_tca_core());
}
