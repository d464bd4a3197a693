//! Typed grid errors.

use super::cell::{Cell, Endpoint};
use super::model::MAX_GRID_SIZE;

/// Failure of a grid query, mutation, or endpoint validation.
///
/// Every variant is recoverable: the grid is left unchanged and the caller
/// can re-issue a valid request.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Grid size must be in `1..=MAX_GRID_SIZE`.
    InvalidSize { size: usize },
    /// The cell lies outside the `size × size` square.
    OutOfBounds { cell: Cell, size: usize },
    /// An endpoint is missing, out of bounds, or coincides with the other.
    InvalidEndpoint { endpoint: Endpoint, detail: String },
    /// An endpoint sits on a wall, or a wall was requested on an endpoint.
    OccupiedEndpoint { endpoint: Endpoint, cell: Cell },
    /// Random wall density was not a number.
    InvalidDensity { density: f64 },
    /// A JSON grid snapshot was malformed.
    Snapshot { detail: String },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSize { size } => {
                write!(f, "grid size must be in 1..={MAX_GRID_SIZE}, got {size}")
            },
            Self::OutOfBounds { cell, size } => {
                write!(f, "cell {cell} is outside the {size}x{size} grid")
            }
            Self::InvalidEndpoint { endpoint, detail } => {
                write!(f, "invalid {endpoint}: {detail}")
            }
            Self::OccupiedEndpoint { endpoint, cell } => {
                write!(f, "{endpoint} {cell} coincides with a wall")
            }
            Self::InvalidDensity { density } => write!(f, "invalid wall density: {density}"),
            Self::Snapshot { detail } => write!(f, "malformed grid snapshot: {detail}"),
        }
    }
}

impl std::error::Error for GridError {}
