//! Core search state machine.
//!
//! [`CoreSearchProblem`] holds a private copy of the network and the current
//! core. It proposes one grow-or-shrink move at a time and evaluates the
//! flux leakage of the result; accepting or rejecting moves is left to the
//! [`Annealer`](crate::anneal::Annealer).

use std::collections::BTreeSet;
use std::sync::Arc;

use lftc_network::MetabolicNetwork;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::anneal::AnnealStrategy;
use crate::connectivity::{connected_subset, is_connected};
use crate::currency::CurrencyMetabolites;
use crate::error::SearchError;
use crate::oracle::{flux_leakage, FluxLeakage};
use crate::policy::CoreSearchPolicy;
use crate::trajectory_log::TrajectoryLog;

/// Current core plus the leakage result last computed for it.
///
/// Cloning is cheap for the leakage (shared) and linear in the core size.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreState {
    reactions: BTreeSet<String>,
    leakage: Arc<FluxLeakage>,
    /// False after a move until the next energy evaluation.
    evaluated: bool,
}

impl CoreState {
    #[must_use]
    pub fn reactions(&self) -> &BTreeSet<String> {
        &self.reactions
    }

    /// Leakage of the last evaluated state. Stale when
    /// [`is_evaluated`](Self::is_evaluated) is false.
    #[must_use]
    pub fn leakage(&self) -> &FluxLeakage {
        &self.leakage
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    #[must_use]
    pub fn into_reactions(self) -> BTreeSet<String> {
        self.reactions
    }

    pub(crate) fn replace_reactions(&mut self, reactions: BTreeSet<String>) {
        self.reactions = reactions;
        self.evaluated = false;
    }

    #[cfg(test)]
    pub(crate) fn reactions_mut(&mut self) -> &mut BTreeSet<String> {
        self.evaluated = false;
        &mut self.reactions
    }
}

/// Effect of one [`CoreSearchProblem::propose_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Added(String),
    Removed(String),
    NoOp,
}

/// Requested versus adopted start set sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRepair {
    pub requested: usize,
    pub kept: usize,
}

impl StartRepair {
    #[must_use]
    pub fn was_repaired(&self) -> bool {
        self.kept < self.requested
    }
}

#[derive(Debug)]
pub struct CoreSearchProblem {
    pub(crate) network: MetabolicNetwork,
    pub(crate) feed: String,
    pub(crate) currency: CurrencyMetabolites,
    pub(crate) start: BTreeSet<String>,
    pub(crate) state: CoreState,
    min_overlap_with_start: f64,
    max_size: f64,
    exclude: BTreeSet<String>,
    repair: StartRepair,
    log: Option<TrajectoryLog>,
}

impl CoreSearchProblem {
    /// Validate `policy`, copy `network`, repair the start set to its
    /// feed-connected subset and evaluate it once.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidConfig`] / [`SearchError::UnknownReaction`] from
    ///   policy validation, when no start reaction is connected to the feed,
    ///   or when `min_overlap_with_start · |start| ≥ max_size`
    /// - any leakage error for the start set
    pub fn new(network: &MetabolicNetwork, policy: CoreSearchPolicy) -> Result<Self, SearchError> {
        policy.validate(network)?;
        let network = network.clone();
        let max_size = policy.max_size(&network);
        let CoreSearchPolicy {
            start: requested,
            feed,
            currency,
            min_overlap_with_start,
            max_overlap_with_model: _,
            exclude,
        } = policy;

        let start = connected_subset(&requested, &feed, &currency, &network)?;
        let repair = StartRepair {
            requested: requested.len(),
            kept: start.len(),
        };
        if start.is_empty() {
            return Err(SearchError::config(format!(
                "no start reaction is connected to feed {feed}"
            )));
        }
        if repair.was_repaired() {
            warn!(
                requested = repair.requested,
                kept = repair.kept,
                feed = %feed,
                "start core not connected to feed; keeping connected subset"
            );
        }

        #[allow(clippy::cast_precision_loss)]
        let min_size = min_overlap_with_start * start.len() as f64;
        if min_size >= max_size {
            return Err(SearchError::config(format!(
                "minimum core size {min_size} is not below maximum size {max_size}"
            )));
        }

        let leakage = flux_leakage(&start, &network, &currency)?;
        Ok(Self {
            network,
            feed,
            currency,
            state: CoreState {
                reactions: start.clone(),
                leakage: Arc::new(leakage),
                evaluated: true,
            },
            start,
            min_overlap_with_start,
            max_size,
            exclude,
            repair,
            log: None,
        })
    }

    /// Log `(energy, size)` before every move.
    #[must_use]
    pub fn with_log(mut self, log: TrajectoryLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Flush and detach the log, returning its record count.
    ///
    /// # Errors
    ///
    /// [`SearchError::Log`] if the flush fails.
    pub fn close_log(&mut self) -> Result<Option<u64>, SearchError> {
        self.log.take().map(TrajectoryLog::close).transpose()
    }

    #[must_use]
    pub fn network(&self) -> &MetabolicNetwork {
        &self.network
    }

    #[must_use]
    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Canonical (repaired) start set.
    #[must_use]
    pub fn start(&self) -> &BTreeSet<String> {
        &self.start
    }

    #[must_use]
    pub fn start_repair(&self) -> StartRepair {
        self.repair
    }

    #[must_use]
    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    #[must_use]
    pub fn state(&self) -> &CoreState {
        &self.state
    }

    #[must_use]
    pub fn core(&self) -> &BTreeSet<String> {
        &self.state.reactions
    }

    /// Recompute and cache the leakage of the current core.
    ///
    /// # Errors
    ///
    /// Any leakage error, e.g. [`SearchError::Infeasible`].
    pub fn energy(&mut self) -> Result<f64, SearchError> {
        let leakage = flux_leakage(&self.state.reactions, &self.network, &self.currency)?;
        let energy = leakage.leakage();
        self.state.leakage = Arc::new(leakage);
        self.state.evaluated = true;
        Ok(energy)
    }

    /// Fraction of the start set still in the core.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overlap_with_start(&self) -> f64 {
        let kept = self.start.intersection(&self.state.reactions).count();
        kept as f64 / self.start.len() as f64
    }

    /// Grow or shrink the core by one reaction.
    ///
    /// With probability ½, and while the core is below the size bound, a
    /// reaction bordering the core is added. Otherwise one member whose
    /// removal keeps the rest connected is dropped; start members are not
    /// candidates once the overlap with the start set is at or below the
    /// minimum.
    ///
    /// # Errors
    ///
    /// [`SearchError::Log`] if logging fails, or a leakage error when the
    /// cached result has to be refreshed first.
    pub fn propose_move(&mut self, rng: &mut StdRng) -> Result<MoveOutcome, SearchError> {
        if !self.state.evaluated {
            self.energy()?;
        }
        if let Some(log) = self.log.as_mut() {
            log.append(self.state.leakage.leakage(), self.state.reactions.len())?;
        }

        #[allow(clippy::cast_precision_loss)]
        let size = self.state.reactions.len() as f64;
        if rng.gen_bool(0.5) && size < self.max_size {
            let candidates: Vec<String> = self
                .state
                .leakage
                .boundary_reactions()
                .into_iter()
                .filter(|id| !self.exclude.contains(id) && !self.state.reactions.contains(id))
                .collect();
            if let Some(chosen) = candidates.choose(rng) {
                self.state.reactions.insert(chosen.clone());
                self.state.evaluated = false;
                debug_assert!(
                    matches!(
                        is_connected(&self.state.reactions, &self.feed, &self.currency, &self.network),
                        Ok(true)
                    ),
                    "adding {chosen} disconnected the core"
                );
                return Ok(MoveOutcome::Added(chosen.clone()));
            }
        }
        self.remove_move(rng)
    }

    fn remove_move(&mut self, rng: &mut StdRng) -> Result<MoveOutcome, SearchError> {
        let mut pool: Vec<String> = self.state.reactions.iter().cloned().collect();
        if self.overlap_with_start() <= self.min_overlap_with_start {
            pool.retain(|id| !self.start.contains(id));
        }
        pool.shuffle(rng);

        for id in pool {
            let mut trial = self.state.reactions.clone();
            trial.remove(&id);
            if trial.is_empty() {
                continue;
            }
            let connected = connected_subset(&trial, &self.feed, &self.currency, &self.network)?;
            if connected.len() == trial.len() {
                self.state.replace_reactions(connected);
                return Ok(MoveOutcome::Removed(id));
            }
        }
        Ok(MoveOutcome::NoOp)
    }
}

impl AnnealStrategy for CoreSearchProblem {
    type State = CoreState;
    type Error = SearchError;

    fn snapshot(&self) -> CoreState {
        self.state.clone()
    }

    fn restore(&mut self, state: CoreState) {
        self.state = state;
    }

    fn propose(&mut self, rng: &mut StdRng) -> Result<(), SearchError> {
        self.propose_move(rng).map(|_| ())
    }

    fn energy(&mut self) -> Result<f64, SearchError> {
        CoreSearchProblem::energy(self)
    }
}
