//! Post-search pruning of reactions the search added but does not need.

use crate::connectivity::connected_subset;
use crate::error::SearchError;
use crate::problem::CoreSearchProblem;

/// What a prune pass changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneReport {
    /// Removed reactions, in the order they were tried.
    pub removed: Vec<String>,
    pub energy_before: f64,
    pub energy_after: f64,
}

impl CoreSearchProblem {
    /// Single pass over the non-start members of the core, in id order.
    ///
    /// Each member is dropped if the rest stays connected and the leakage
    /// does not get worse. Combinations are not tried, so the result can
    /// depend on the order.
    ///
    /// # Errors
    ///
    /// Any leakage error.
    pub fn prune(&mut self) -> Result<PruneReport, SearchError> {
        let energy_before = self.energy()?;
        let mut current = energy_before;
        let mut removed = Vec::new();

        let added: Vec<String> = self.state.reactions().difference(&self.start).cloned().collect();
        for id in added {
            let mut trial = self.state.reactions().clone();
            trial.remove(&id);
            if trial.is_empty() {
                continue;
            }
            let connected = connected_subset(&trial, &self.feed, &self.currency, &self.network)?;
            if connected.len() != trial.len() {
                continue;
            }

            let previous = self.state.clone();
            self.state.replace_reactions(connected);
            let energy = self.energy()?;
            if energy > current {
                self.state = previous;
            } else {
                current = energy;
                removed.push(id);
            }
        }

        Ok(PruneReport {
            removed,
            energy_before,
            energy_after: current,
        })
    }
}
