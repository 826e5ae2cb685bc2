//! Canonical hashing types and domain separation constants.
//!
//! Algorithm: SHA-256 over `domain bytes ‖ data`. Every production hash
//! selects its domain through [`HashDomain`].

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

use crate::cobra_json::CobraModelDoc;
use crate::digest::canon::canonical_json_bytes;
use crate::model::{MetabolicNetwork, NetworkError};

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    /// Network snapshot (canonical COBRA JSON of the whole model).
    NetworkModel => b"LFTC::NETWORK_MODEL::V1\0",

    /// Sorted core reaction id list.
    CoreSet => b"LFTC::CORE_SET::V1\0",

    /// Persisted batch report body.
    BatchReport => b"LFTC::BATCH_REPORT::V1\0",
}

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the colon is missing or either side is empty.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// SHA-256 of `domain ‖ data`, formatted as `"sha256:<hex>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let hex_digest = hex::encode(hasher.finalize());
    let full = format!("sha256:{hex_digest}");
    ContentHash { colon: 6, full }
}

/// Digest of a network's full content (ids, names, stoichiometry, bounds).
///
/// # Errors
///
/// [`NetworkError::Parse`] if the snapshot cannot be converted to JSON.
pub fn network_digest(network: &MetabolicNetwork) -> Result<ContentHash, NetworkError> {
    let value = serde_json::to_value(CobraModelDoc::from_network(network)).map_err(|e| {
        NetworkError::Parse {
            detail: e.to_string(),
        }
    })?;
    Ok(canonical_hash(
        HashDomain::NetworkModel,
        &canonical_json_bytes(&value),
    ))
}

/// Fingerprint of a reaction id set (order-independent by construction).
#[must_use]
pub fn core_set_digest(reactions: &BTreeSet<String>) -> ContentHash {
    let value = serde_json::Value::Array(
        reactions
            .iter()
            .map(|id| serde_json::Value::String(id.clone()))
            .collect(),
    );
    canonical_hash(HashDomain::CoreSet, &canonical_json_bytes(&value))
}
