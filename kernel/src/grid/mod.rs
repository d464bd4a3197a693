//! Grid model: occupancy, endpoints, adjacency, and the mutation boundary.
//!
//! The grid owns no search state. It is mutated through [`edit`] by the
//! editing surface and borrowed read-only by a search run.

pub mod cell;
pub mod edit;
pub mod error;
pub mod model;
pub mod snapshot;

pub use cell::{Cell, Endpoint};
pub use edit::MAX_WALL_DENSITY;
pub use error::GridError;
pub use model::{Grid, MAX_GRID_SIZE};
