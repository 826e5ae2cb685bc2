//! Trajectory and batch runner.
//!
//! # Pipeline
//!
//! ```text
//! CoreSearchProblem::new(network, policy) → [with_log(<log_dir>/<seed>.csv)]
//!   → Annealer::run(problem, seed) → close_log() → [prune()]
//!   → TrajectoryResult
//! ```
//!
//! A batch runs one trajectory per seed on the rayon pool. Each trajectory
//! clones the network it is given; nothing mutable is shared between seeds.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use lftc_network::digest::hash::{core_set_digest, network_digest};
use lftc_network::MetabolicNetwork;
use lftc_search::{
    AnnealSchedule, Annealer, CoreSearchPolicy, CoreSearchProblem, SearchError, TrajectoryLog,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::report::{BatchReport, SeedOutcome};

/// Everything needed to run one seed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub policy: CoreSearchPolicy,
    pub schedule: AnnealSchedule,
    /// Run the post-search pruner on the best state.
    pub prune: bool,
    /// Directory for `<seed>.csv` trajectory logs.
    pub log_dir: Option<PathBuf>,
    /// Stops every trajectory between steps once set.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl RunConfig {
    /// Default schedule, pruning on, no logs.
    #[must_use]
    pub fn new(policy: CoreSearchPolicy) -> Self {
        Self {
            policy,
            schedule: AnnealSchedule::default(),
            prune: true,
            log_dir: None,
            interrupt: None,
        }
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: AnnealSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn log_path(&self, seed: u64) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| dir.join(format!("{seed}.csv")))
    }
}

/// Final core of one seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub seed: u64,
    pub core: BTreeSet<String>,
    /// `sha256:` fingerprint of `core`.
    pub core_digest: String,
    /// Best energy found by annealing.
    pub energy: f64,
    /// Energy after pruning, if the pruner ran.
    pub pruned_energy: Option<f64>,
    /// Reactions the pruner removed, in the order tried.
    pub pruned: Vec<String>,
    pub steps_taken: u64,
    pub accepted: u64,
    pub improved: u64,
    pub interrupted: bool,
    /// Records written to the trajectory log, if one was kept.
    pub log_records: Option<u64>,
}

impl TrajectoryResult {
    /// Energy of the reported core.
    #[must_use]
    pub fn final_energy(&self) -> f64 {
        self.pruned_energy.unwrap_or(self.energy)
    }
}

/// Error during a trajectory or batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// Configuration, LP or log failure inside the search.
    Search(SearchError),
    /// The network could not be digested.
    Network { detail: String },
    /// A trajectory panicked; the payload message is preserved.
    Panicked { seed: u64, detail: String },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search(err) => write!(f, "{err}"),
            Self::Network { detail } => write!(f, "network error: {detail}"),
            Self::Panicked { seed, detail } => write!(f, "seed {seed} panicked: {detail}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<SearchError> for RunError {
    fn from(err: SearchError) -> Self {
        Self::Search(err)
    }
}

/// Anneal one seed from the policy's start set.
///
/// The trajectory log, when configured, is closed before any annealing error
/// is returned, so a failed run still leaves its records on disk.
///
/// # Errors
///
/// [`RunError::Search`] for configuration, LP and log failures.
pub fn run_trajectory(
    network: &MetabolicNetwork,
    config: &RunConfig,
    seed: u64,
) -> Result<TrajectoryResult, RunError> {
    let mut annealer = Annealer::new(config.schedule)?;
    if let Some(flag) = &config.interrupt {
        annealer = annealer.with_interrupt(Arc::clone(flag));
    }

    let mut problem = CoreSearchProblem::new(network, config.policy.clone())?;
    if let Some(path) = config.log_path(seed) {
        problem = problem.with_log(TrajectoryLog::create(&path)?);
    }

    let outcome = annealer.run(&mut problem, seed);
    let log_records = problem.close_log();
    let outcome = outcome?;
    let log_records = log_records?;
    debug!(
        seed,
        best_energy = outcome.best_energy,
        steps = outcome.steps_taken,
        accepted = outcome.accepted,
        "trajectory annealed"
    );

    let (pruned_energy, pruned) = if config.prune {
        let report = problem.prune()?;
        (Some(report.energy_after), report.removed)
    } else {
        (None, Vec::new())
    };

    let core = problem.core().clone();
    Ok(TrajectoryResult {
        seed,
        core_digest: core_set_digest(&core).to_string(),
        core,
        energy: outcome.best_energy,
        pruned_energy,
        pruned,
        steps_taken: outcome.steps_taken,
        accepted: outcome.accepted,
        improved: outcome.improved,
        interrupted: outcome.interrupted,
        log_records,
    })
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run every seed in parallel and collect the outcomes, sorted by seed.
///
/// A seed that fails or panics is recorded as [`SeedOutcome::Failed`]; the
/// other seeds are unaffected.
///
/// # Errors
///
/// [`RunError::Network`] if the network cannot be digested.
pub fn run_batch(
    network: &MetabolicNetwork,
    config: &RunConfig,
    seeds: &[u64],
) -> Result<BatchReport, RunError> {
    let digest = network_digest(network).map_err(|e| RunError::Network {
        detail: e.to_string(),
    })?;

    let mut outcomes: Vec<SeedOutcome> = seeds
        .par_iter()
        .map(|&seed| {
            let result = catch_unwind(AssertUnwindSafe(|| run_trajectory(network, config, seed)))
                .unwrap_or_else(|payload| {
                    Err(RunError::Panicked {
                        seed,
                        detail: panic_detail(payload.as_ref()),
                    })
                });
            match result {
                Ok(trajectory) => SeedOutcome::Completed(trajectory),
                Err(err) => {
                    warn!(seed, error = %err, "trajectory failed");
                    SeedOutcome::Failed {
                        seed,
                        error: err.to_string(),
                    }
                }
            }
        })
        .collect();
    outcomes.sort_by_key(SeedOutcome::seed);

    let report = BatchReport {
        network_id: network.id().to_string(),
        network_digest: digest.to_string(),
        feed: config.policy.feed.clone(),
        start: config.policy.start.clone(),
        schedule: config.schedule,
        outcomes,
    };
    info!(
        seeds = seeds.len(),
        completed = report.completed().count(),
        best_energy = ?report.best().map(TrajectoryResult::final_energy),
        "batch finished"
    );
    Ok(report)
}
