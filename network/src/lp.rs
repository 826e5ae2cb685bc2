//! Steady-state flux linear program over a [`MetabolicNetwork`].
//!
//! Every reaction `j` is split into two non-negative variables so that the net
//! flux is `v_j = fwd_j - rev_j`:
//!
//! ```text
//! fwd_j ∈ [max(lb_j, 0), max(ub_j, 0)]
//! rev_j ∈ [max(-ub_j, 0), max(-lb_j, 0)]
//! ```
//!
//! Each metabolite contributes one equality row `Σ_j S_ij (fwd_j - rev_j) = 0`.
//! Objectives are linear in the split variables, which lets callers weight
//! one direction of a reversible reaction without touching the other.

use std::collections::BTreeMap;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};

use crate::model::MetabolicNetwork;

/// Direction of a split flux variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FluxDirection {
    Forward,
    Reverse,
}

/// One half of a reaction's split flux.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FluxVariable {
    pub reaction: String,
    pub direction: FluxDirection,
}

impl FluxVariable {
    #[must_use]
    pub fn forward(reaction: impl Into<String>) -> Self {
        Self {
            reaction: reaction.into(),
            direction: FluxDirection::Forward,
        }
    }

    #[must_use]
    pub fn reverse(reaction: impl Into<String>) -> Self {
        Self {
            reaction: reaction.into(),
            direction: FluxDirection::Reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationSense {
    Minimize,
    Maximize,
}

/// Optimal flux distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxSolution {
    pub objective_value: f64,
    /// Reaction id → net flux (`fwd - rev`), for every reaction in the network.
    pub fluxes: BTreeMap<String, f64>,
}

impl FluxSolution {
    #[must_use]
    pub fn flux(&self, reaction: &str) -> Option<f64> {
        self.fluxes.get(reaction).copied()
    }
}

/// LP failure.
#[derive(Debug, Clone, PartialEq)]
pub enum LpError {
    /// No flux distribution satisfies steady state and the bounds.
    Infeasible,
    /// The objective can be improved without limit.
    Unbounded,
    /// The objective names a reaction that is not in the network.
    UnknownReaction { id: String },
    /// An objective weight is NaN or infinite.
    InvalidWeight { reaction: String, weight: f64 },
}

impl std::fmt::Display for LpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infeasible => write!(f, "flux LP is infeasible"),
            Self::Unbounded => write!(f, "flux LP is unbounded"),
            Self::UnknownReaction { id } => write!(f, "objective references unknown reaction {id}"),
            Self::InvalidWeight { reaction, weight } => {
                write!(f, "invalid objective weight {weight} for reaction {reaction}")
            }
        }
    }
}

impl std::error::Error for LpError {}

fn forward_bounds(lower: f64, upper: f64) -> (f64, f64) {
    (lower.max(0.0), upper.max(0.0))
}

fn reverse_bounds(lower: f64, upper: f64) -> (f64, f64) {
    ((-upper).max(0.0), (-lower).max(0.0))
}

impl MetabolicNetwork {
    /// Solve the steady-state LP for a linear objective over split fluxes.
    ///
    /// Variables absent from `objective` get weight zero.
    ///
    /// # Errors
    ///
    /// - [`LpError::UnknownReaction`] / [`LpError::InvalidWeight`] for a bad objective
    /// - [`LpError::Infeasible`] / [`LpError::Unbounded`] from the solver
    pub fn solve_lp(
        &self,
        objective: &BTreeMap<FluxVariable, f64>,
        sense: OptimizationSense,
    ) -> Result<FluxSolution, LpError> {
        let mut weights: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for (variable, weight) in objective {
            if !self.contains_reaction(&variable.reaction) {
                return Err(LpError::UnknownReaction {
                    id: variable.reaction.clone(),
                });
            }
            if !weight.is_finite() {
                return Err(LpError::InvalidWeight {
                    reaction: variable.reaction.clone(),
                    weight: *weight,
                });
            }
            let entry = weights.entry(variable.reaction.as_str()).or_insert((0.0, 0.0));
            match variable.direction {
                FluxDirection::Forward => entry.0 += weight,
                FluxDirection::Reverse => entry.1 += weight,
            }
        }

        let mut problem = Problem::new(match sense {
            OptimizationSense::Minimize => OptimizationDirection::Minimize,
            OptimizationSense::Maximize => OptimizationDirection::Maximize,
        });

        let mut split: BTreeMap<&str, (Variable, Variable)> = BTreeMap::new();
        for reaction in self.reactions() {
            let (fwd_weight, rev_weight) = weights
                .get(reaction.id.as_str())
                .copied()
                .unwrap_or((0.0, 0.0));
            let fwd = problem.add_var(
                fwd_weight,
                forward_bounds(reaction.lower_bound, reaction.upper_bound),
            );
            let rev = problem.add_var(
                rev_weight,
                reverse_bounds(reaction.lower_bound, reaction.upper_bound),
            );
            split.insert(reaction.id.as_str(), (fwd, rev));
        }

        for metabolite in self.metabolites() {
            let mut row = LinearExpr::empty();
            let mut terms = 0usize;
            for reaction_id in self.reactions_of(&metabolite.id) {
                let (Some(reaction), Some((fwd, rev))) =
                    (self.reaction(reaction_id), split.get(reaction_id))
                else {
                    continue;
                };
                let Some(coefficient) = reaction.stoichiometry.get(&metabolite.id) else {
                    continue;
                };
                row.add(*fwd, *coefficient);
                row.add(*rev, -*coefficient);
                terms += 1;
            }
            if terms > 0 {
                problem.add_constraint(row, ComparisonOp::Eq, 0.0);
            }
        }

        let solution = problem.solve().map_err(|err| match err {
            minilp::Error::Infeasible => LpError::Infeasible,
            minilp::Error::Unbounded => LpError::Unbounded,
        })?;

        let fluxes = split
            .iter()
            .map(|(id, (fwd, rev))| ((*id).to_string(), solution[*fwd] - solution[*rev]))
            .collect();

        Ok(FluxSolution {
            objective_value: solution.objective(),
            fluxes,
        })
    }
}
