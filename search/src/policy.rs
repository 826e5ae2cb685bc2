//! Core search configuration.

use std::collections::BTreeSet;

use lftc_network::MetabolicNetwork;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyMetabolites;
use crate::error::SearchError;

/// Default fraction of the start set a core must keep.
pub const DEFAULT_MIN_OVERLAP_WITH_START: f64 = 0.8;
/// Default fraction of the network a core may grow to.
pub const DEFAULT_MAX_OVERLAP_WITH_MODEL: f64 = 1.0;

/// Everything that defines one core search apart from the network and the
/// annealing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSearchPolicy {
    /// Requested start core. Repaired to its connected subset at construction.
    pub start: BTreeSet<String>,
    /// Carbon uptake reaction every core member must be connected to.
    pub feed: String,
    pub currency: CurrencyMetabolites,
    /// Once `|core ∩ start| / |start|` drops to this, start members are protected.
    pub min_overlap_with_start: f64,
    /// Upper bound on core size as a fraction of all reactions.
    pub max_overlap_with_model: f64,
    /// Reactions never added to the core (typically exchanges).
    pub exclude: BTreeSet<String>,
}

impl CoreSearchPolicy {
    /// Policy with default currency, overlaps and an empty exclusion set.
    #[must_use]
    pub fn new<I, S>(start: I, feed: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start: start.into_iter().map(Into::into).collect(),
            feed: feed.into(),
            currency: CurrencyMetabolites::default(),
            min_overlap_with_start: DEFAULT_MIN_OVERLAP_WITH_START,
            max_overlap_with_model: DEFAULT_MAX_OVERLAP_WITH_MODEL,
            exclude: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyMetabolites) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn with_min_overlap_with_start(mut self, fraction: f64) -> Self {
        self.min_overlap_with_start = fraction;
        self
    }

    #[must_use]
    pub fn with_max_overlap_with_model(mut self, fraction: f64) -> Self {
        self.max_overlap_with_model = fraction;
        self
    }

    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Largest core allowed on `network`.
    #[must_use]
    pub fn max_size(&self, network: &MetabolicNetwork) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let reactions = network.reaction_count() as f64;
        self.max_overlap_with_model * reactions
    }

    /// Check the policy against `network` before any search state exists.
    ///
    /// The size bound that depends on the repaired start set is checked by
    /// the search itself.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] for out-of-range fractions, an empty
    /// start set, or a start set that intersects the exclusion set;
    /// [`SearchError::UnknownReaction`] for ids absent from `network`.
    pub fn validate(&self, network: &MetabolicNetwork) -> Result<(), SearchError> {
        check_fraction("min_overlap_with_start", self.min_overlap_with_start)?;
        check_fraction("max_overlap_with_model", self.max_overlap_with_model)?;
        if self.start.is_empty() {
            return Err(SearchError::config("start set is empty"));
        }
        let known = std::iter::once(&self.feed)
            .chain(&self.start)
            .chain(&self.exclude);
        for id in known {
            if !network.contains_reaction(id) {
                return Err(SearchError::UnknownReaction { id: id.clone() });
            }
        }
        if let Some(id) = self.start.intersection(&self.exclude).next() {
            return Err(SearchError::config(format!(
                "start reaction {id} is also excluded"
            )));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<(), SearchError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SearchError::config(format!("{name} must be in [0, 1], got {value}")))
    }
}
