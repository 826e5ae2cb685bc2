//! Generic simulated annealing engine.
//!
//! The engine owns the temperature ladder, Metropolis acceptance, rollback
//! and best-state tracking. Problems plug in through [`AnnealStrategy`]; the
//! engine never looks inside a state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SearchError;

/// Exponential cooling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    /// Number of move proposals.
    pub steps: u64,
    /// Starting temperature.
    pub t_max: f64,
    /// Final temperature.
    pub t_min: f64,
    /// Number of progress records over the run (0 disables them).
    pub updates: u64,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            steps: 50_000,
            t_max: 25_000.0,
            t_min: 2.5,
            updates: 100,
        }
    }
}

impl AnnealSchedule {
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] if `steps` is zero, a temperature is
    /// not finite and positive, or `t_min > t_max`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.steps == 0 {
            return Err(SearchError::config("annealing needs at least one step"));
        }
        for (name, t) in [("t_max", self.t_max), ("t_min", self.t_min)] {
            if !t.is_finite() || t <= 0.0 {
                return Err(SearchError::config(format!(
                    "{name} must be finite and positive, got {t}"
                )));
            }
        }
        if self.t_min > self.t_max {
            return Err(SearchError::config(format!(
                "t_min {} exceeds t_max {}",
                self.t_min, self.t_max
            )));
        }
        Ok(())
    }

    /// `t_max · exp(−ln(t_max / t_min) · step / steps)`.
    #[must_use]
    pub fn temperature(&self, step: u64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let progress = step as f64 / self.steps as f64;
        let factor = -(self.t_max / self.t_min).ln();
        self.t_max * (factor * progress).exp()
    }

    fn update_interval(&self) -> Option<u64> {
        (self.updates > 0).then(|| (self.steps / self.updates).max(1))
    }
}

/// A problem the engine can anneal.
///
/// `snapshot`/`restore` must capture everything `propose` depends on, so a
/// rejected proposal leaves no trace.
pub trait AnnealStrategy {
    type State: Clone;
    type Error;

    fn snapshot(&self) -> Self::State;

    fn restore(&mut self, state: Self::State);

    /// Mutate the current state in place.
    ///
    /// # Errors
    ///
    /// Implementation-defined; aborts the run.
    fn propose(&mut self, rng: &mut StdRng) -> Result<(), Self::Error>;

    /// Energy of the current state (lower is better).
    ///
    /// # Errors
    ///
    /// Implementation-defined; aborts the run.
    fn energy(&mut self) -> Result<f64, Self::Error>;
}

/// What a finished run reports.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealOutcome<T> {
    pub best_state: T,
    pub best_energy: f64,
    pub steps_taken: u64,
    pub accepted: u64,
    pub improved: u64,
    /// True if the interrupt flag stopped the run before `steps`.
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
pub struct Annealer {
    schedule: AnnealSchedule,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Annealer {
    /// # Errors
    ///
    /// As [`AnnealSchedule::validate`].
    pub fn new(schedule: AnnealSchedule) -> Result<Self, SearchError> {
        schedule.validate()?;
        Ok(Self {
            schedule,
            interrupt: None,
        })
    }

    /// Stop between steps once `flag` is set.
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[must_use]
    pub fn schedule(&self) -> &AnnealSchedule {
        &self.schedule
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Anneal `strategy` from its current state with a generator seeded from
    /// `seed`. On return the strategy holds the best state seen.
    ///
    /// # Errors
    ///
    /// The first error raised by `propose` or `energy`.
    pub fn run<S: AnnealStrategy>(
        &self,
        strategy: &mut S,
        seed: u64,
    ) -> Result<AnnealOutcome<S::State>, S::Error> {
        let mut rng = StdRng::seed_from_u64(seed);
        let interval = self.schedule.update_interval();

        let mut previous_energy = strategy.energy()?;
        let mut previous = strategy.snapshot();
        let mut best = previous.clone();
        let mut best_energy = previous_energy;

        let mut step = 0;
        let mut accepted = 0;
        let mut improved = 0;
        let mut interrupted = false;

        while step < self.schedule.steps {
            if self.interrupted() {
                interrupted = true;
                break;
            }
            step += 1;
            let temperature = self.schedule.temperature(step);

            strategy.propose(&mut rng)?;
            let energy = strategy.energy()?;
            let delta = energy - previous_energy;

            if delta > 0.0 && (-delta / temperature).exp() < rng.gen::<f64>() {
                strategy.restore(previous.clone());
            } else {
                accepted += 1;
                if delta < 0.0 {
                    improved += 1;
                }
                previous = strategy.snapshot();
                previous_energy = energy;
                if energy < best_energy {
                    best = previous.clone();
                    best_energy = energy;
                }
            }

            if interval.is_some_and(|every| step % every == 0) {
                #[allow(clippy::cast_precision_loss)]
                let acceptance = accepted as f64 / step as f64;
                debug!(
                    step,
                    temperature,
                    energy = previous_energy,
                    best_energy,
                    acceptance,
                    improved,
                    "anneal progress"
                );
            }
        }

        strategy.restore(best.clone());
        Ok(AnnealOutcome {
            best_state: best,
            best_energy,
            steps_taken: step,
            accepted,
            improved,
            interrupted,
        })
    }
}
