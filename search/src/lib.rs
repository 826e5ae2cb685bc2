//! LFTC Search: simulated-annealing search for a minimal, feed-connected
//! core of a metabolic network that minimizes flux leaking into it.
//!
//! This crate depends only on `lftc_network`. It does NOT depend on
//! `lftc_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! lftc_network  ←  lftc_search  ←  lftc_harness
//! (model, LP)      (explorer,      (batch runner, reports,
//!                   oracle, anneal) reference networks)
//! ```
//!
//! # Key types
//!
//! - [`connectivity::connected_subset`] -- feed-connected closure of a reaction set
//! - [`oracle::flux_leakage`] -- LP-based flux leaking into a core
//! - [`CoreSearchProblem`] -- grow/shrink state machine over core sets
//! - [`Annealer`] -- schedule, Metropolis acceptance and rollback for any
//!   [`AnnealStrategy`]
//! - [`CoreSearchPolicy`] -- search configuration

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod anneal;
pub mod connectivity;
pub mod currency;
pub mod error;
pub mod oracle;
pub mod policy;
pub mod problem;
pub mod prune;
pub mod trajectory_log;

pub use anneal::{AnnealOutcome, AnnealSchedule, AnnealStrategy, Annealer};
pub use currency::CurrencyMetabolites;
pub use error::SearchError;
pub use oracle::FluxLeakage;
pub use policy::CoreSearchPolicy;
pub use problem::{CoreSearchProblem, CoreState, MoveOutcome, StartRepair};
pub use prune::PruneReport;
pub use trajectory_log::TrajectoryLog;
