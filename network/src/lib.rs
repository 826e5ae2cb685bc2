//! LFTC Network: the stoichiometric metabolic network the core search runs on.
//!
//! # API Surface
//!
//! - [`model::MetabolicNetwork`] -- reactions, metabolites, bounds and the
//!   metabolite → reaction incidence index
//! - [`lp`] -- steady-state flux LP over a network (forward/reverse split
//!   variables, solved with `minilp`)
//! - [`cobra_json`] -- COBRA JSON model loading and writing
//! - [`digest`] -- canonical JSON bytes and domain-separated SHA-256 digests
//!
//! # Module Dependency Direction
//!
//! `model` ← `lp` ← `cobra_json` ← `digest`
//!
//! One-way only. `model` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cobra_json;
pub mod digest;
pub mod lp;
pub mod model;

pub use lp::{FluxDirection, FluxSolution, FluxVariable, LpError, OptimizationSense};
pub use model::{MetabolicNetwork, Metabolite, NetworkError, Reaction};
