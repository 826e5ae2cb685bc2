//! LFTC Harness: runs core searches over seeds and packages the results.
//!
//! The harness does NOT implement search logic; it delegates to
//! `lftc_search`. It owns orchestration (parallel seeds, log files, pruning)
//! and persistence of batch reports.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod report;
pub mod runner;
pub mod worlds;

pub use report::{BatchReport, ReportError, SeedOutcome};
pub use runner::{run_batch, run_trajectory, RunConfig, RunError, TrajectoryResult};
