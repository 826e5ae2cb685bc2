//! Content digests: canonical JSON bytes and domain-separated SHA-256.
//!
//! Batch reports carry the digest of the network they were computed on, and
//! every reported core set carries its own fingerprint, so two reports can be
//! compared without re-running the search.

pub mod canon;
pub mod hash;
