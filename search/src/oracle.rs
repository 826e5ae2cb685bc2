//! Flux leakage oracle.
//!
//! The leakage of a core is the least total flux that reactions outside the
//! core must push into the core's boundary metabolites for the whole network
//! to reach steady state. It is the optimum of one LP over the full network.

use std::collections::{BTreeMap, BTreeSet};

use lftc_network::{FluxVariable, MetabolicNetwork, OptimizationSense, Reaction};

use crate::currency::CurrencyMetabolites;
use crate::error::SearchError;

/// Result of one leakage evaluation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxLeakage {
    leakage: f64,
    producing: BTreeMap<String, f64>,
    consuming: BTreeMap<String, f64>,
}

impl FluxLeakage {
    /// Total flux into the core (`Σ producing − Σ consuming`, never negative).
    #[must_use]
    pub fn leakage(&self) -> f64 {
        self.leakage
    }

    /// Outside reactions producing a boundary metabolite → flux (`≥ 0`).
    #[must_use]
    pub fn producing(&self) -> &BTreeMap<String, f64> {
        &self.producing
    }

    /// Outside reversible reactions consuming a boundary metabolite → flux (`≤ 0`).
    #[must_use]
    pub fn consuming(&self) -> &BTreeMap<String, f64> {
        &self.consuming
    }

    /// Union of producing and consuming reaction ids: the reactions one step
    /// outside the core.
    #[must_use]
    pub fn boundary_reactions(&self) -> BTreeSet<String> {
        self.producing
            .keys()
            .chain(self.consuming.keys())
            .cloned()
            .collect()
    }

    /// Copy of `network` with producing fluxes as upper bounds and consuming
    /// fluxes as lower bounds.
    ///
    /// # Errors
    ///
    /// [`SearchError::UnknownReaction`] if a flux names a reaction missing from
    /// `network`, or [`SearchError::Network`] if a limit conflicts with the
    /// reaction's other bound.
    pub fn apply_limits(&self, network: &MetabolicNetwork) -> Result<MetabolicNetwork, SearchError> {
        let mut limited = network.clone();
        for (id, flux) in &self.producing {
            limited.set_upper_bound(id, *flux)?;
        }
        for (id, flux) in &self.consuming {
            limited.set_lower_bound(id, *flux)?;
        }
        Ok(limited)
    }
}

/// Non-currency metabolites at the edge of the core: every reactant of a core
/// reaction, plus the products of reversible core reactions.
///
/// # Errors
///
/// [`SearchError::UnknownReaction`] for a core id missing from `network`.
pub fn boundary_metabolites(
    core: &BTreeSet<String>,
    network: &MetabolicNetwork,
    currency: &CurrencyMetabolites,
) -> Result<BTreeSet<String>, SearchError> {
    let mut metabolites = BTreeSet::new();
    for id in core {
        let reaction = network
            .reaction(id)
            .ok_or_else(|| SearchError::UnknownReaction { id: id.clone() })?;
        metabolites.extend(reaction.reactants().map(ToString::to_string));
        if reaction.is_reversible() {
            metabolites.extend(reaction.products().map(ToString::to_string));
        }
    }
    metabolites.retain(|m| !currency.contains(m));
    Ok(metabolites)
}

/// Reactions outside `core` that list any of `metabolites` as a product.
#[must_use]
pub fn producing_reactions_outside(
    metabolites: &BTreeSet<String>,
    network: &MetabolicNetwork,
    core: &BTreeSet<String>,
) -> BTreeSet<String> {
    outside_touching(metabolites, network, core, |reaction, m| reaction.has_product(m))
}

/// Reversible reactions outside `core` that list any of `metabolites` as a
/// reactant.
#[must_use]
pub fn consuming_reversible_reactions_outside(
    metabolites: &BTreeSet<String>,
    network: &MetabolicNetwork,
    core: &BTreeSet<String>,
) -> BTreeSet<String> {
    outside_touching(metabolites, network, core, |reaction, m| {
        reaction.is_reversible() && reaction.has_reactant(m)
    })
}

fn outside_touching(
    metabolites: &BTreeSet<String>,
    network: &MetabolicNetwork,
    core: &BTreeSet<String>,
    keep: impl Fn(&Reaction, &str) -> bool,
) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for metabolite in metabolites {
        for id in network.reactions_of(metabolite) {
            if core.contains(id) || found.contains(id) {
                continue;
            }
            if network.reaction(id).is_some_and(|r| keep(r, metabolite.as_str())) {
                found.insert(id.to_string());
            }
        }
    }
    found
}

/// Minimum flux leaking into `core`.
///
/// Minimizes the forward flux of every producing reaction plus the reverse
/// flux of every consuming reaction, subject to steady state and the
/// network's bounds. Net fluxes are then clamped (producing to `≥ 0`,
/// consuming to `≤ 0`). `network` is not modified.
///
/// # Errors
///
/// - [`SearchError::EmptyCore`] for an empty core
/// - [`SearchError::UnknownReaction`] for a core id missing from `network`
/// - [`SearchError::Infeasible`] / [`SearchError::Unbounded`] from the LP
pub fn flux_leakage(
    core: &BTreeSet<String>,
    network: &MetabolicNetwork,
    currency: &CurrencyMetabolites,
) -> Result<FluxLeakage, SearchError> {
    if core.is_empty() {
        return Err(SearchError::EmptyCore);
    }
    let metabolites = boundary_metabolites(core, network, currency)?;
    let producing_ids = producing_reactions_outside(&metabolites, network, core);
    let consuming_ids = consuming_reversible_reactions_outside(&metabolites, network, core);

    let mut objective = BTreeMap::new();
    for id in &producing_ids {
        objective.insert(FluxVariable::forward(id.as_str()), 1.0);
    }
    for id in &consuming_ids {
        objective.insert(FluxVariable::reverse(id.as_str()), 1.0);
    }
    let solution = network.solve_lp(&objective, OptimizationSense::Minimize)?;

    let flux_of = |id: &str| solution.flux(id).unwrap_or(0.0);
    let producing: BTreeMap<String, f64> = producing_ids
        .into_iter()
        .map(|id| {
            let flux = flux_of(&id).max(0.0);
            (id, flux)
        })
        .collect();
    let consuming: BTreeMap<String, f64> = consuming_ids
        .into_iter()
        .map(|id| {
            let flux = flux_of(&id).min(0.0);
            (id, flux)
        })
        .collect();
    let leakage = producing.values().sum::<f64>() - consuming.values().sum::<f64>();

    Ok(FluxLeakage {
        leakage,
        producing,
        consuming,
    })
}
