//! Core search lock tests: start repair, size and protection bounds,
//! pruning and trajectory logs on the pinned toy network.

use std::io::Write;
use std::sync::{Arc, Mutex};

use lftc_harness::worlds::toy_central_carbon;
use lftc_search::trajectory_log::read_trajectory_log;
use lftc_search::{
    AnnealSchedule, Annealer, CoreSearchProblem, MoveOutcome, SearchError, TrajectoryLog,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn schedule(steps: u64) -> AnnealSchedule {
    AnnealSchedule {
        steps,
        t_max: 5.0,
        t_min: 0.01,
        updates: 0,
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn unreachable_start_member_is_dropped_with_a_warning() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut policy = toy_central_carbon::policy(&net).with_min_overlap_with_start(1.0);
    policy.start.insert("ACt".to_string());

    let captured = Captured::default();
    let sink = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .finish();
    let problem =
        tracing::subscriber::with_default(subscriber, || CoreSearchProblem::new(&net, policy))
            .unwrap();

    assert_eq!(problem.start(), &toy_central_carbon::glycolysis_tca_core());
    assert!(problem.start_repair().was_repaired());
    assert_eq!(problem.start_repair().requested, 10);
    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("WARN"), "no warning in {logs:?}");
    assert!(logs.contains("start core not connected"), "{logs:?}");
}

#[test]
fn repaired_start_evaluates_cleanly() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut policy = toy_central_carbon::policy(&net);
    policy.start.insert("ACt".to_string());
    let mut problem = CoreSearchProblem::new(&net, policy).unwrap();

    let energy = problem.energy().unwrap();
    assert!(energy >= 0.0);
    assert!(problem
        .state()
        .leakage()
        .boundary_reactions()
        .is_disjoint(problem.core()));
}

#[test]
fn infeasible_size_bounds_are_rejected() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    // 9 start reactions, 0.5 · 18 = 9 allowed: min size 9 is not below 9.
    let policy = toy_central_carbon::policy(&net)
        .with_min_overlap_with_start(1.0)
        .with_max_overlap_with_model(0.5);
    assert!(matches!(
        CoreSearchProblem::new(&net, policy).unwrap_err(),
        SearchError::InvalidConfig { .. }
    ));
}

#[test]
fn excluded_start_member_is_rejected() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut policy = toy_central_carbon::policy(&net);
    policy.start.insert(toy_central_carbon::FEED.to_string());
    assert!(matches!(
        CoreSearchProblem::new(&net, policy).unwrap_err(),
        SearchError::InvalidConfig { .. }
    ));
}

#[test]
fn moves_respect_size_and_protection_bounds() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let policy = toy_central_carbon::policy(&net).with_max_overlap_with_model(0.6);
    for seed in 0..4 {
        let mut problem = CoreSearchProblem::new(&net, policy.clone()).unwrap();
        let limit = problem.max_size().ceil();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..300 {
            let protected = problem.overlap_with_start() <= policy.min_overlap_with_start;
            let outcome = problem.propose_move(&mut rng).unwrap();
            if let MoveOutcome::Removed(id) = &outcome {
                assert!(
                    !(protected && problem.start().contains(id)),
                    "seed {seed}: removed protected {id}"
                );
            }
            if let MoveOutcome::Added(id) = &outcome {
                assert!(!policy.exclude.contains(id));
            }
            #[allow(clippy::cast_precision_loss)]
            let size = problem.core().len() as f64;
            assert!(size <= limit, "seed {seed}: size {size} > {limit}");
            problem.energy().unwrap();
        }
    }
}

#[test]
fn annealing_reaches_the_leak_free_core() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut problem = CoreSearchProblem::new(&net, toy_central_carbon::policy(&net)).unwrap();
    let outcome = Annealer::new(schedule(400)).unwrap().run(&mut problem, 21).unwrap();
    assert!(outcome.best_energy.abs() < 1e-6, "best {}", outcome.best_energy);
    assert_eq!(outcome.best_state.reactions(), problem.core());
    assert!(problem.state().is_evaluated());
}

#[test]
fn pruning_never_raises_energy() {
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    for seed in [1, 2, 3] {
        let mut problem = CoreSearchProblem::new(&net, toy_central_carbon::policy(&net)).unwrap();
        let outcome = Annealer::new(schedule(200)).unwrap().run(&mut problem, seed).unwrap();
        let report = problem.prune().unwrap();
        assert!((report.energy_before - outcome.best_energy).abs() < 1e-9);
        assert!(report.energy_after <= report.energy_before + 1e-12);
        for id in &report.removed {
            assert!(!problem.start().contains(id), "pruned start member {id}");
            assert!(!problem.core().contains(id));
        }
    }
}

#[test]
fn trajectory_log_has_one_record_per_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("7.csv");
    let net = toy_central_carbon::fixed_growth_network().unwrap();
    let mut problem = CoreSearchProblem::new(&net, toy_central_carbon::policy(&net))
        .unwrap()
        .with_log(TrajectoryLog::create(&path).unwrap());
    Annealer::new(schedule(50)).unwrap().run(&mut problem, 7).unwrap();
    assert_eq!(problem.close_log().unwrap(), Some(50));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("energy,size\n"));
    let records = read_trajectory_log(&path).unwrap();
    assert_eq!(records.len(), 50);
    assert_eq!(records[0].size, 9);
    assert!((records[0].energy - toy_central_carbon::GLYCOLYSIS_TCA_LEAKAGE).abs() < 1e-6);
    assert!(records.iter().all(|r| r.energy >= 0.0 && r.size > 0));
}
