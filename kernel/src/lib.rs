//! Pathtrace Kernel: the grid model and canonical hashing.
//!
//! # API Surface
//!
//! - [`grid::Grid`] -- square occupancy map with start/goal endpoints
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 digests
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON writer
//!
//! # Module Dependency Direction
//!
//! `proof` ← `grid`
//!
//! One-way only. `grid` uses `proof` for snapshot digests.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod grid;
pub mod proof;
