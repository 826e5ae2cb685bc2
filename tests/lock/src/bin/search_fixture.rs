//! Binary that runs a short seed batch on the toy central carbon network
//! and prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: key=value lines (see source for format). Logs go to stderr and
//! follow `RUST_LOG` (default `warn`).

use std::process::ExitCode;

use lftc_harness::runner::{run_batch, RunConfig};
use lftc_harness::worlds::toy_central_carbon;
use lftc_search::AnnealSchedule;
use tracing_subscriber::EnvFilter;

const SEEDS: [u64; 4] = [1, 2, 3, 4];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let network = match toy_central_carbon::fixed_growth_network() {
        Ok(network) => network,
        Err(err) => {
            eprintln!("network: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = RunConfig::new(toy_central_carbon::policy(&network)).with_schedule(AnnealSchedule {
        steps: 300,
        t_max: 5.0,
        t_min: 0.01,
        updates: 10,
    });

    let report = match run_batch(&network, &config, &SEEDS) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("batch: {err}");
            return ExitCode::FAILURE;
        }
    };
    let digest = match report.digest() {
        Ok(digest) => digest,
        Err(err) => {
            eprintln!("report: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("network_digest={}", report.network_digest);
    println!("report_digest={digest}");
    println!("completed={}", report.completed().count());
    println!("failed={}", report.failures().count());
    if let Some(best) = report.best() {
        println!("best_seed={}", best.seed);
        println!("best_energy={}", best.final_energy());
        println!("best_core_size={}", best.core.len());
        println!("best_core_digest={}", best.core_digest);
    }
    ExitCode::SUCCESS
}
