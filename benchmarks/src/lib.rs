//! Shared helpers for LFTC benchmark suites.

use std::collections::BTreeSet;

use lftc_network::{MetabolicNetwork, Metabolite, NetworkError, Reaction};
use lftc_search::CoreSearchPolicy;

/// Feed reaction of [`ladder_network`].
pub const LADDER_FEED: &str = "EX_x0";

/// Linear pathway `x0 → x1 → … → x{steps}` with uptake pinned at 10 and the
/// end product drained at 10. Every rung `x{i}` also has a side supply
/// `EX_y{i}: y{i} ->` feeding it through `S{i}: y{i} -> x{i}`, so any core
/// covering part of the chain has a reaction to leak through.
///
/// # Errors
///
/// Propagates [`NetworkError`] from network construction.
pub fn ladder_network(steps: usize) -> Result<MetabolicNetwork, NetworkError> {
    let mut network = MetabolicNetwork::new(format!("ladder_{steps}"));
    for i in 0..=steps {
        network.add_metabolite(Metabolite::new(format!("x{i}"), "c"))?;
    }
    network.add_reaction(Reaction::new(LADDER_FEED, [("x0", -1.0)], -10.0, -10.0))?;
    for i in 1..=steps {
        network.add_metabolite(Metabolite::new(format!("y{i}"), "c"))?;
        network.add_reaction(Reaction::new(
            format!("R{i}"),
            [(format!("x{}", i - 1), -1.0), (format!("x{i}"), 1.0)],
            0.0,
            1000.0,
        ))?;
        network.add_reaction(Reaction::new(
            format!("S{i}"),
            [(format!("y{i}"), -1.0), (format!("x{i}"), 1.0)],
            0.0,
            1000.0,
        ))?;
        network.add_reaction(Reaction::new(
            format!("EX_y{i}"),
            [(format!("y{i}"), -1.0)],
            -1000.0,
            0.0,
        ))?;
    }
    network.add_reaction(Reaction::new(
        "DM_end",
        [(format!("x{steps}"), -1.0)],
        10.0,
        10.0,
    ))?;
    Ok(network)
}

/// The first `len` rungs `R1..R{len}`.
#[must_use]
pub fn ladder_core(len: usize) -> BTreeSet<String> {
    (1..=len).map(|i| format!("R{i}")).collect()
}

/// Policy over [`ladder_network`] starting from half of the chain.
#[must_use]
pub fn ladder_policy(network: &MetabolicNetwork, steps: usize) -> CoreSearchPolicy {
    CoreSearchPolicy::new(ladder_core((steps / 2).max(1)), LADDER_FEED)
        .with_exclude(network.boundary_reactions())
}
