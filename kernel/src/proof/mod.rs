//! Proof module: canonical JSON and domain-separated hashing.
//!
//! Depends on nothing else in the kernel. `grid` uses it for snapshot digests.

pub mod canon;
pub mod hash;
pub mod hash_domain;
