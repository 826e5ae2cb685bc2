//! Metabolic network data model.
//!
//! A network is a set of metabolites and a set of reactions; each reaction
//! carries a sparse stoichiometry (metabolite id → coefficient) and flux
//! bounds. Negative coefficients mark reactants, positive ones products.
//!
//! All collections are `BTreeMap`/`BTreeSet` so that iteration order, and
//! therefore every downstream LP formulation and digest, is deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// A metabolite (species) in the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metabolite {
    pub id: String,
    pub name: String,
    /// Compartment code (`c`, `e`, `m`, ...). Empty when unknown.
    pub compartment: String,
}

impl Metabolite {
    #[must_use]
    pub fn new(id: impl Into<String>, compartment: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            compartment: compartment.into(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A reaction with stoichiometry and flux bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub id: String,
    pub name: String,
    /// Metabolite id → stoichiometric coefficient (never zero).
    pub stoichiometry: BTreeMap<String, f64>,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Reaction {
    /// Build a reaction from `(metabolite, coefficient)` pairs.
    ///
    /// Repeated metabolites are summed. Validation (known metabolites,
    /// non-zero coefficients, ordered bounds) happens when the reaction is
    /// added to a [`MetabolicNetwork`].
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, stoichiometry: I, lower_bound: f64, upper_bound: f64) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let id = id.into();
        let mut coefficients: BTreeMap<String, f64> = BTreeMap::new();
        for (metabolite, coefficient) in stoichiometry {
            *coefficients.entry(metabolite.into()).or_insert(0.0) += coefficient;
        }
        Self {
            name: id.clone(),
            id,
            stoichiometry: coefficients,
            lower_bound,
            upper_bound,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Metabolites consumed when the reaction runs forward.
    pub fn reactants(&self) -> impl Iterator<Item = &str> {
        self.stoichiometry
            .iter()
            .filter(|(_, c)| **c < 0.0)
            .map(|(m, _)| m.as_str())
    }

    /// Metabolites produced when the reaction runs forward.
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.stoichiometry
            .iter()
            .filter(|(_, c)| **c > 0.0)
            .map(|(m, _)| m.as_str())
    }

    /// Every participating metabolite.
    pub fn metabolites(&self) -> impl Iterator<Item = &str> {
        self.stoichiometry.keys().map(String::as_str)
    }

    #[must_use]
    pub fn has_reactant(&self, metabolite: &str) -> bool {
        self.stoichiometry.get(metabolite).is_some_and(|c| *c < 0.0)
    }

    #[must_use]
    pub fn has_product(&self, metabolite: &str) -> bool {
        self.stoichiometry.get(metabolite).is_some_and(|c| *c > 0.0)
    }

    /// COBRA reversibility: the bounds admit flux in both directions.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.0 && self.upper_bound > 0.0
    }

    /// Boundary (exchange, demand, sink) reactions touch exactly one metabolite.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.stoichiometry.len() == 1
    }
}

/// Error building or editing a network.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    DuplicateMetabolite { id: String },
    DuplicateReaction { id: String },
    UnknownMetabolite { reaction: String, metabolite: String },
    UnknownReaction { id: String },
    /// Bounds are NaN or `lower > upper`.
    InvalidBounds { reaction: String, lower: f64, upper: f64 },
    /// A coefficient is zero or not finite.
    InvalidCoefficient { reaction: String, metabolite: String },
    /// Model document could not be parsed.
    Parse { detail: String },
    /// Model file could not be read or written.
    Io { detail: String },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMetabolite { id } => write!(f, "duplicate metabolite id: {id}"),
            Self::DuplicateReaction { id } => write!(f, "duplicate reaction id: {id}"),
            Self::UnknownMetabolite {
                reaction,
                metabolite,
            } => write!(
                f,
                "reaction {reaction} references unknown metabolite {metabolite}"
            ),
            Self::UnknownReaction { id } => write!(f, "unknown reaction id: {id}"),
            Self::InvalidBounds {
                reaction,
                lower,
                upper,
            } => write!(
                f,
                "invalid bounds for reaction {reaction}: [{lower}, {upper}]"
            ),
            Self::InvalidCoefficient {
                reaction,
                metabolite,
            } => write!(
                f,
                "invalid coefficient for {metabolite} in reaction {reaction}"
            ),
            Self::Parse { detail } => write!(f, "model parse error: {detail}"),
            Self::Io { detail } => write!(f, "model I/O error: {detail}"),
        }
    }
}

impl std::error::Error for NetworkError {}

fn check_bounds(reaction: &str, lower: f64, upper: f64) -> Result<(), NetworkError> {
    if lower.is_nan() || upper.is_nan() || lower > upper {
        return Err(NetworkError::InvalidBounds {
            reaction: reaction.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

/// A stoichiometric metabolic network.
///
/// `Clone` is a full deep copy: search trajectories clone the network once
/// and never share it.
#[derive(Debug, Clone, Default)]
pub struct MetabolicNetwork {
    id: String,
    metabolites: BTreeMap<String, Metabolite>,
    reactions: BTreeMap<String, Reaction>,
    /// Metabolite id → ids of reactions it participates in.
    incidence: BTreeMap<String, BTreeSet<String>>,
}

impl MetabolicNetwork {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a metabolite.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateMetabolite`] if the id is taken.
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), NetworkError> {
        if self.metabolites.contains_key(&metabolite.id) {
            return Err(NetworkError::DuplicateMetabolite { id: metabolite.id });
        }
        self.incidence.entry(metabolite.id.clone()).or_default();
        self.metabolites.insert(metabolite.id.clone(), metabolite);
        Ok(())
    }

    /// Add a reaction whose metabolites are already present.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateReaction`], [`NetworkError::UnknownMetabolite`],
    /// [`NetworkError::InvalidCoefficient`] or [`NetworkError::InvalidBounds`].
    /// The network is unchanged on error.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), NetworkError> {
        if self.reactions.contains_key(&reaction.id) {
            return Err(NetworkError::DuplicateReaction { id: reaction.id });
        }
        for (metabolite, coefficient) in &reaction.stoichiometry {
            if !self.metabolites.contains_key(metabolite) {
                return Err(NetworkError::UnknownMetabolite {
                    reaction: reaction.id.clone(),
                    metabolite: metabolite.clone(),
                });
            }
            if *coefficient == 0.0 || !coefficient.is_finite() {
                return Err(NetworkError::InvalidCoefficient {
                    reaction: reaction.id.clone(),
                    metabolite: metabolite.clone(),
                });
            }
        }
        check_bounds(&reaction.id, reaction.lower_bound, reaction.upper_bound)?;

        for metabolite in reaction.stoichiometry.keys() {
            self.incidence
                .entry(metabolite.clone())
                .or_default()
                .insert(reaction.id.clone());
        }
        self.reactions.insert(reaction.id.clone(), reaction);
        Ok(())
    }

    #[must_use]
    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.get(id)
    }

    #[must_use]
    pub fn metabolite(&self, id: &str) -> Option<&Metabolite> {
        self.metabolites.get(id)
    }

    #[must_use]
    pub fn contains_reaction(&self, id: &str) -> bool {
        self.reactions.contains_key(id)
    }

    /// All reactions in id order.
    pub fn reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.values()
    }

    /// All metabolites in id order.
    pub fn metabolites(&self) -> impl Iterator<Item = &Metabolite> {
        self.metabolites.values()
    }

    /// All reaction ids in order.
    pub fn reaction_ids(&self) -> impl Iterator<Item = &str> {
        self.reactions.keys().map(String::as_str)
    }

    /// Ids of reactions the metabolite participates in (empty if unknown).
    pub fn reactions_of(&self, metabolite: &str) -> impl Iterator<Item = &str> {
        self.incidence
            .get(metabolite)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    /// Ids of boundary (exchange, demand, sink) reactions.
    #[must_use]
    pub fn boundary_reactions(&self) -> BTreeSet<String> {
        self.reactions
            .values()
            .filter(|r| r.is_boundary())
            .map(|r| r.id.clone())
            .collect()
    }

    #[must_use]
    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    #[must_use]
    pub fn metabolite_count(&self) -> usize {
        self.metabolites.len()
    }

    /// Current `(lower, upper)` bounds of a reaction.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownReaction`] if the id is absent.
    pub fn bounds(&self, id: &str) -> Result<(f64, f64), NetworkError> {
        self.reactions
            .get(id)
            .map(|r| (r.lower_bound, r.upper_bound))
            .ok_or_else(|| NetworkError::UnknownReaction { id: id.to_string() })
    }

    /// Replace both bounds of a reaction.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownReaction`] or [`NetworkError::InvalidBounds`].
    pub fn set_bounds(&mut self, id: &str, lower: f64, upper: f64) -> Result<(), NetworkError> {
        check_bounds(id, lower, upper)?;
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownReaction { id: id.to_string() })?;
        reaction.lower_bound = lower;
        reaction.upper_bound = upper;
        Ok(())
    }

    /// Replace the upper bound, keeping the lower bound.
    ///
    /// # Errors
    ///
    /// Same as [`MetabolicNetwork::set_bounds`].
    pub fn set_upper_bound(&mut self, id: &str, upper: f64) -> Result<(), NetworkError> {
        let (lower, _) = self.bounds(id)?;
        self.set_bounds(id, lower, upper)
    }

    /// Replace the lower bound, keeping the upper bound.
    ///
    /// # Errors
    ///
    /// Same as [`MetabolicNetwork::set_bounds`].
    pub fn set_lower_bound(&mut self, id: &str, lower: f64) -> Result<(), NetworkError> {
        let (_, upper) = self.bounds(id)?;
        self.set_bounds(id, lower, upper)
    }
}
