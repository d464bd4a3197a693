//! Pathtrace Harness: the editing and playback boundary around the search.
//!
//! The harness owns the grid an editor mutates, caches the last run, and
//! exposes playback and per-cell presentation state. Run results can be
//! packaged as content-addressed bundles and persisted to a directory.
//!
//! The harness does NOT implement search logic; it delegates to
//! `pathtrace_search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod playback;
pub mod session;
pub mod view;

pub use bundle::{build_run_bundle, replay_run_bundle, verify_run_bundle, RunBundle, RunBundleError};
pub use bundle_dir::{read_run_dir, write_run_dir, RunDirError};
pub use playback::PlaybackCursor;
pub use session::{EditSession, DEFAULT_GRID_SIZE};
pub use view::{render_cells, CellState, GridView};
