//! Toy central carbon metabolism: glucose uptake through glycolysis, a
//! lumped TCA cycle, acetate overflow and a pentose-phosphate branch feeding
//! a two-precursor biomass drain.
//!
//! With glucose uptake pinned at 10 and biomass at 1, the glycolysis + TCA
//! core leaks exactly 1 unit through PEP carboxylase (the only other source
//! of oxaloacetate). Adding PPC to the core closes the leak.

use std::collections::BTreeSet;

use lftc_network::cobra_json::from_cobra_json;
use lftc_network::{MetabolicNetwork, NetworkError};
use lftc_search::CoreSearchPolicy;

const MODEL_JSON: &str = include_str!("toy_central_carbon.json");

pub const FEED: &str = "EX_glc_e";
pub const BIOMASS: &str = "BIOMASS";
pub const GLUCOSE_UPTAKE: f64 = -10.0;
pub const BIOMASS_FLUX: f64 = 1.0;

/// Leakage of [`glycolysis_tca_core`] on [`fixed_growth_network`].
pub const GLYCOLYSIS_TCA_LEAKAGE: f64 = 1.0;

/// The model as shipped: uptake up to 10, biomass free.
///
/// # Errors
///
/// Only if the bundled document is corrupt.
pub fn network() -> Result<MetabolicNetwork, NetworkError> {
    from_cobra_json(MODEL_JSON)
}

/// Uptake and biomass pinned, so every core has to account for real flux.
///
/// # Errors
///
/// Only if the bundled document is corrupt.
pub fn fixed_growth_network() -> Result<MetabolicNetwork, NetworkError> {
    let mut network = network()?;
    network.set_bounds(FEED, GLUCOSE_UPTAKE, GLUCOSE_UPTAKE)?;
    network.set_bounds(BIOMASS, BIOMASS_FLUX, BIOMASS_FLUX)?;
    Ok(network)
}

/// Upper glycolysis through citrate turnover.
#[must_use]
pub fn glycolysis_tca_core() -> BTreeSet<String> {
    ["GLCpts", "PGI", "PFK", "FBA", "GAPD", "PYK", "PDH", "CS", "TCA"]
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Search policy starting from [`glycolysis_tca_core`], with every exchange
/// reaction excluded from the core.
#[must_use]
pub fn policy(network: &MetabolicNetwork) -> CoreSearchPolicy {
    CoreSearchPolicy::new(glycolysis_tca_core(), FEED).with_exclude(network.boundary_reactions())
}
