//! Pathtrace Search: deterministic A* with a replayable frame trace.
//!
//! This crate provides the search layer. It depends only on
//! `pathtrace_kernel`. It does NOT depend on `pathtrace_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! pathtrace_kernel  ←  pathtrace_search  ←  pathtrace_harness
//! (grid, hashing)      (A*, frames)          (session, playback, bundles)
//! ```
//!
//! # Key types
//!
//! - [`OpenFrontier`]: lazy-deletion heap keyed by `(f_cost, sequence)`
//! - [`Frame`]: immutable snapshot at one pop event
//! - [`Trace`]: the full frame sequence with random-access reads
//! - [`SearchResult`]: trace, path, termination reason and counters
//! - [`SearchPolicy`]: per-run step budget

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod frame;
pub mod frontier;
pub mod policy;
pub mod search;
pub mod trace;

pub use error::{SearchError, TraceError};
pub use frame::{Frame, SearchStats, TerminationReason};
pub use frontier::{FrontierKey, FrontierPop, OpenFrontier};
pub use policy::{PolicyError, SearchPolicy, DEFAULT_MAX_STEPS};
pub use search::{run, run_with_policy, SearchResult};
pub use trace::{reconstruct_partial_path, reconstruct_path, Trace, TraceRecorder};
