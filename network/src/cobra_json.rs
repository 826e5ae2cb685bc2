//! COBRA JSON model documents.
//!
//! Reads and writes the JSON layout used by COBRA toolboxes
//! (`{"id", "metabolites": [...], "reactions": [...]}`). Fields this crate
//! does not model (genes, annotations, objective coefficients) are ignored on
//! read and omitted on write. Infinite bounds are written as `null` and read
//! back as ±∞.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{MetabolicNetwork, Metabolite, NetworkError, Reaction};

/// Serialized model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CobraModelDoc {
    #[serde(default)]
    pub id: String,
    pub metabolites: Vec<CobraMetaboliteDoc>,
    pub reactions: Vec<CobraReactionDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CobraMetaboliteDoc {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub compartment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CobraReactionDoc {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub metabolites: BTreeMap<String, f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl CobraModelDoc {
    /// Snapshot a network as a document (ids in sorted order).
    #[must_use]
    pub fn from_network(network: &MetabolicNetwork) -> Self {
        Self {
            id: network.id().to_string(),
            metabolites: network
                .metabolites()
                .map(|m| CobraMetaboliteDoc {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    compartment: m.compartment.clone(),
                })
                .collect(),
            reactions: network
                .reactions()
                .map(|r| CobraReactionDoc {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    metabolites: r.stoichiometry.clone(),
                    lower_bound: finite_or_none(r.lower_bound),
                    upper_bound: finite_or_none(r.upper_bound),
                })
                .collect(),
        }
    }

    /// Build a validated network from the document.
    ///
    /// # Errors
    ///
    /// Any [`NetworkError`] raised while adding metabolites or reactions.
    pub fn into_network(self) -> Result<MetabolicNetwork, NetworkError> {
        let mut network = MetabolicNetwork::new(self.id);
        for m in self.metabolites {
            let name = if m.name.is_empty() { m.id.clone() } else { m.name };
            network.add_metabolite(Metabolite::new(m.id, m.compartment).with_name(name))?;
        }
        for r in self.reactions {
            let name = if r.name.is_empty() { r.id.clone() } else { r.name };
            let reaction = Reaction::new(
                r.id,
                r.metabolites,
                r.lower_bound.unwrap_or(f64::NEG_INFINITY),
                r.upper_bound.unwrap_or(f64::INFINITY),
            )
            .with_name(name);
            network.add_reaction(reaction)?;
        }
        Ok(network)
    }
}

/// Parse a COBRA JSON document into a network.
///
/// # Errors
///
/// [`NetworkError::Parse`] for malformed JSON, otherwise any validation error.
pub fn from_cobra_json(text: &str) -> Result<MetabolicNetwork, NetworkError> {
    let doc: CobraModelDoc = serde_json::from_str(text).map_err(|e| NetworkError::Parse {
        detail: e.to_string(),
    })?;
    doc.into_network()
}

/// Read a COBRA JSON file.
///
/// # Errors
///
/// [`NetworkError::Io`] if the file cannot be read, otherwise as [`from_cobra_json`].
pub fn from_cobra_json_path(path: &Path) -> Result<MetabolicNetwork, NetworkError> {
    let text = std::fs::read_to_string(path).map_err(|e| NetworkError::Io {
        detail: format!("{}: {e}", path.display()),
    })?;
    from_cobra_json(&text)
}

/// Serialize a network as pretty-printed COBRA JSON.
///
/// # Errors
///
/// [`NetworkError::Parse`] if serialization fails.
pub fn to_cobra_json(network: &MetabolicNetwork) -> Result<String, NetworkError> {
    serde_json::to_string_pretty(&CobraModelDoc::from_network(network)).map_err(|e| {
        NetworkError::Parse {
            detail: e.to_string(),
        }
    })
}
