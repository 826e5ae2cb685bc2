//! Typed search errors.
//!
//! Configuration errors are raised while a search is being constructed and
//! are always fatal. `Infeasible` and `Unbounded` come from the flux LP during
//! an energy evaluation and abort the trajectory that hit them. A move that
//! finds nothing to remove is not an error (it is a no-op).

use lftc_network::{LpError, NetworkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Policy or schedule rejected before search begins.
    InvalidConfig { detail: String },
    /// A reaction id is not part of the network.
    UnknownReaction { id: String },
    /// A leakage evaluation was requested for an empty core.
    EmptyCore,
    /// The flux LP has no feasible solution for the network's bounds.
    Infeasible,
    /// The flux LP objective is unbounded.
    Unbounded,
    /// Other LP formulation failure.
    Lp { detail: String },
    /// Network edit failed (e.g. applying flux limits).
    Network { detail: String },
    /// Trajectory log could not be written.
    Log { detail: String },
}

impl SearchError {
    pub(crate) fn config(detail: impl Into<String>) -> Self {
        Self::InvalidConfig {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig { detail } => write!(f, "invalid search configuration: {detail}"),
            Self::UnknownReaction { id } => write!(f, "reaction not in network: {id}"),
            Self::EmptyCore => write!(f, "core reaction set is empty"),
            Self::Infeasible => write!(f, "flux leakage LP is infeasible"),
            Self::Unbounded => write!(f, "flux leakage LP is unbounded"),
            Self::Lp { detail } => write!(f, "flux leakage LP failed: {detail}"),
            Self::Network { detail } => write!(f, "network error: {detail}"),
            Self::Log { detail } => write!(f, "trajectory log error: {detail}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<LpError> for SearchError {
    fn from(err: LpError) -> Self {
        match err {
            LpError::Infeasible => Self::Infeasible,
            LpError::Unbounded => Self::Unbounded,
            LpError::UnknownReaction { id } => Self::UnknownReaction { id },
            other @ LpError::InvalidWeight { .. } => Self::Lp {
                detail: other.to_string(),
            },
        }
    }
}

impl From<NetworkError> for SearchError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::UnknownReaction { id } => Self::UnknownReaction { id },
            other => Self::Network {
                detail: other.to_string(),
            },
        }
    }
}
