//! Connectivity explorer: which candidate reactions are reachable from the
//! feed reaction through shared non-currency metabolites.

use std::collections::{BTreeSet, VecDeque};

use lftc_network::MetabolicNetwork;

use crate::currency::CurrencyMetabolites;
use crate::error::SearchError;

/// Breadth-first closure of `candidates` around `feed`.
///
/// Starting from the feed, each visited reaction's non-currency metabolites
/// are expanded to every reaction touching them; reactions in `candidates`
/// join the frontier and the result. The feed seeds the traversal but is
/// returned only when it is itself a candidate, so the result is always a
/// subset of `candidates`. Applying the explorer to its own output returns
/// the same set.
///
/// # Errors
///
/// [`SearchError::UnknownReaction`] if `feed` is not in `network`.
pub fn connected_subset(
    candidates: &BTreeSet<String>,
    feed: &str,
    currency: &CurrencyMetabolites,
    network: &MetabolicNetwork,
) -> Result<BTreeSet<String>, SearchError> {
    if !network.contains_reaction(feed) {
        return Err(SearchError::UnknownReaction { id: feed.to_string() });
    }

    let mut visited: BTreeSet<&str> = BTreeSet::from([feed]);
    let mut frontier: VecDeque<&str> = VecDeque::from([feed]);
    let mut connected = BTreeSet::new();
    if candidates.contains(feed) {
        connected.insert(feed.to_string());
    }

    while let Some(current) = frontier.pop_front() {
        let Some(reaction) = network.reaction(current) else {
            continue;
        };
        for metabolite in reaction.metabolites().filter(|m| !currency.contains(m)) {
            for neighbour in network.reactions_of(metabolite) {
                if !candidates.contains(neighbour) || !visited.insert(neighbour) {
                    continue;
                }
                connected.insert(neighbour.to_string());
                frontier.push_back(neighbour);
            }
        }
    }
    Ok(connected)
}

/// Whether every member of `core` is reachable from `feed`.
///
/// # Errors
///
/// As [`connected_subset`].
pub fn is_connected(
    core: &BTreeSet<String>,
    feed: &str,
    currency: &CurrencyMetabolites,
    network: &MetabolicNetwork,
) -> Result<bool, SearchError> {
    Ok(connected_subset(core, feed, currency, network)?.len() == core.len())
}
