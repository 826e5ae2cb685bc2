//! Currency metabolites: cofactors and ubiquitous small molecules that are
//! ignored when tracing carbon connectivity and core boundaries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Cytosolic currency metabolites included by default. Each one also gets a
/// mitochondrial (`_m`) twin.
const DEFAULT_CYTOSOLIC: &[&str] = &[
    "h2o_c", "pi_c", "co2_c", "atp_c", "coa_c", "imp_c", "gmp_c", "adp_c", "amp_c", "h_c",
    "nadph_c", "q6h2_c", "q6_c", "nadp_c", "nadh_c", "nad_c", "nh4_c", "ppi_c", "gtp_c",
    "gdp_c", "o2_c", "q8h2_c", "q8_c", "fad_c", "fadh2_c",
];

const DEFAULT_EXTRA: &[&str] = &["h_e"];

/// Immutable set of metabolite ids treated as currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyMetabolites(BTreeSet<String>);

impl CurrencyMetabolites {
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    /// No currency metabolites: every metabolite counts for connectivity.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    #[must_use]
    pub fn contains(&self, metabolite: &str) -> bool {
        self.0.contains(metabolite)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for CurrencyMetabolites {
    fn default() -> Self {
        let mitochondrial = DEFAULT_CYTOSOLIC
            .iter()
            .filter_map(|id| id.strip_suffix("_c"))
            .map(|stem| format!("{stem}_m"));
        Self(
            DEFAULT_CYTOSOLIC
                .iter()
                .chain(DEFAULT_EXTRA)
                .map(ToString::to_string)
                .chain(mitochondrial)
                .collect(),
        )
    }
}
