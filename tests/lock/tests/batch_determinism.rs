//! Batch runner lock tests: seed determinism, aggregation and persistence.

use lftc_harness::report::{BatchReport, SeedOutcome};
use lftc_harness::runner::{run_batch, RunConfig};
use lftc_harness::worlds::toy_central_carbon;
use lftc_network::digest::hash::network_digest;
use lftc_search::AnnealSchedule;

const SEEDS: [u64; 5] = [11, 3, 7, 5, 1];

fn config() -> RunConfig {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    RunConfig::new(toy_central_carbon::policy(&net)).with_schedule(AnnealSchedule {
        steps: 200,
        t_max: 5.0,
        t_min: 0.01,
        updates: 0,
    })
}

#[test]
fn batch_is_deterministic_inproc() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let first = run_batch(&net, &config(), &SEEDS).unwrap();
    let first_bytes = first.canonical_bytes().unwrap();
    for _ in 0..3 {
        let again = run_batch(&net, &config(), &SEEDS).unwrap();
        assert_eq!(again.canonical_bytes().unwrap(), first_bytes);
    }
}

#[test]
fn outcomes_are_sorted_and_complete() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let report = run_batch(&net, &config(), &SEEDS).unwrap();
    let seeds: Vec<u64> = report.outcomes.iter().map(SeedOutcome::seed).collect();
    assert_eq!(seeds, vec![1, 3, 5, 7, 11]);
    assert_eq!(report.completed().count(), SEEDS.len());
    assert_eq!(report.network_digest, network_digest(&net).unwrap().to_string());
    assert_eq!(report.start, toy_central_carbon::glycolysis_tca_core());
}

#[test]
fn best_is_the_minimum_final_energy() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let report = run_batch(&net, &config(), &SEEDS).unwrap();
    let best = report.best().unwrap();
    for result in report.completed() {
        assert!(best.final_energy() <= result.final_energy());
        if result.final_energy() == best.final_energy() {
            assert!(best.seed <= result.seed);
        }
        assert!(result.final_energy() <= toy_central_carbon::GLYCOLYSIS_TCA_LEAKAGE + 1e-9);
    }
}

#[test]
fn report_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.json");
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let report = run_batch(&net, &config(), &[1, 2]).unwrap();
    report.write_json(&path).unwrap();

    let back = BatchReport::read_json(&path).unwrap();
    assert_eq!(back, report);
    assert_eq!(back.digest().unwrap(), report.digest().unwrap());

    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["feed"], toy_central_carbon::FEED);
    assert_eq!(value["outcomes"][0]["status"], "completed");
}

#[test]
fn logs_are_written_per_seed() {
    let dir = tempfile::tempdir().unwrap();
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let report = run_batch(&net, &config().with_log_dir(dir.path()), &[4, 9]).unwrap();
    for result in report.completed() {
        assert_eq!(result.log_records, Some(200));
        assert!(dir.path().join(format!("{}.csv", result.seed)).exists());
    }
}
