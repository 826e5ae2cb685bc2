//! Batch report: per-seed outcomes bound to the network they were computed on.
//!
//! Persisted as canonical JSON (sorted keys, no whitespace), so two runs with
//! the same network, policy, schedule and seeds write identical files.

use std::collections::BTreeSet;
use std::path::Path;

use lftc_network::digest::canon::canonical_json_bytes;
use lftc_network::digest::hash::{canonical_hash, ContentHash, HashDomain};
use lftc_search::AnnealSchedule;
use serde::{Deserialize, Serialize};

use crate::runner::TrajectoryResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedOutcome {
    Completed(TrajectoryResult),
    Failed { seed: u64, error: String },
}

impl SeedOutcome {
    #[must_use]
    pub fn seed(&self) -> u64 {
        match self {
            Self::Completed(result) => result.seed,
            Self::Failed { seed, .. } => *seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub network_id: String,
    /// `sha256:` digest of the network every seed ran on.
    pub network_digest: String,
    pub feed: String,
    pub start: BTreeSet<String>,
    pub schedule: AnnealSchedule,
    /// One entry per seed, sorted by seed.
    pub outcomes: Vec<SeedOutcome>,
}

/// Error persisting or loading a report.
#[derive(Debug)]
pub enum ReportError {
    Io { detail: String },
    Json { detail: String },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Json { detail } => write!(f, "report JSON error: {detail}"),
        }
    }
}

impl std::error::Error for ReportError {}

impl BatchReport {
    pub fn completed(&self) -> impl Iterator<Item = &TrajectoryResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            SeedOutcome::Completed(result) => Some(result),
            SeedOutcome::Failed { .. } => None,
        })
    }

    /// `(seed, error)` of every failed seed.
    pub fn failures(&self) -> impl Iterator<Item = (u64, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            SeedOutcome::Failed { seed, error } => Some((*seed, error.as_str())),
            SeedOutcome::Completed(_) => None,
        })
    }

    /// Completed seed with the lowest final energy; ties go to the lower seed.
    #[must_use]
    pub fn best(&self) -> Option<&TrajectoryResult> {
        self.completed().min_by(|a, b| {
            a.final_energy()
                .total_cmp(&b.final_energy())
                .then(a.seed.cmp(&b.seed))
        })
    }

    /// Canonical JSON bytes of the whole report.
    ///
    /// # Errors
    ///
    /// [`ReportError::Json`] if the report cannot be converted to JSON.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let value = serde_json::to_value(self).map_err(|e| ReportError::Json {
            detail: e.to_string(),
        })?;
        Ok(canonical_json_bytes(&value))
    }

    /// Content digest of [`canonical_bytes`](Self::canonical_bytes).
    ///
    /// # Errors
    ///
    /// As [`BatchReport::canonical_bytes`].
    pub fn digest(&self) -> Result<ContentHash, ReportError> {
        Ok(canonical_hash(HashDomain::BatchReport, &self.canonical_bytes()?))
    }

    /// # Errors
    ///
    /// [`ReportError::Json`] or [`ReportError::Io`].
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let bytes = self.canonical_bytes()?;
        std::fs::write(path, bytes).map_err(|e| ReportError::Io {
            detail: format!("{}: {e}", path.display()),
        })
    }

    /// # Errors
    ///
    /// [`ReportError::Io`] if the file cannot be read, [`ReportError::Json`]
    /// if it is not a report.
    pub fn read_json(path: &Path) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path).map_err(|e| ReportError::Io {
            detail: format!("{}: {e}", path.display()),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ReportError::Json {
            detail: e.to_string(),
        })
    }
}
