//! The occupancy grid and its adjacency queries.

use super::cell::{Cell, Endpoint};
use super::error::GridError;

/// Largest accepted side length. Snapshots come from disk, so the cell
/// buffer is bounded before it is allocated.
pub const MAX_GRID_SIZE: usize = 4096;

/// Square occupancy map with optional search endpoints.
///
/// Cells are stored row-major; `walls[row * size + col]` is `true` for a
/// blocked cell. The grid never holds search state. A search borrows it
/// immutably, so it cannot change underneath a run.
///
/// Invariant: `start` and `goal`, when set, are in bounds, free, and distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub(crate) size: usize,
    pub(crate) walls: Vec<bool>,
    pub(crate) start: Option<Cell>,
    pub(crate) goal: Option<Cell>,
}

impl Grid {
    /// Create an empty (all free) `size × size` grid with no endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] when `size == 0` or
    /// `size > MAX_GRID_SIZE`.
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(GridError::InvalidSize { size });
        }
        let cells = size
            .checked_mul(size)
            .ok_or(GridError::InvalidSize { size })?;
        Ok(Self {
            size,
            walls: vec![false; cells],
            start: None,
            goal: None,
        })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size²`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Row-major linear index, or `None` when out of bounds.
    #[must_use]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell).then(|| cell.row * self.size + cell.col)
    }

    /// Inverse of [`Grid::index_of`].
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.cell_count()).then(|| Cell::new(index / self.size, index % self.size))
    }

    /// `true` for an in-bounds wall. Out-of-bounds cells are not walls.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some_and(|i| self.walls[i])
    }

    /// `true` for an in-bounds cell that is not a wall.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some_and(|i| !self.walls[i])
    }

    /// Number of walls currently set.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }

    /// Orthogonally adjacent free cells, in the fixed order
    /// **down, up, right, left**.
    ///
    /// The order feeds the search tie-break (earlier neighbors get smaller
    /// insertion sequence numbers), so it must never change.
    #[must_use]
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let mut out = Vec::with_capacity(4);
        if !self.in_bounds(cell) {
            return out;
        }
        let Cell { row, col } = cell;
        let candidates = [
            (row + 1 < self.size).then(|| Cell::new(row + 1, col)),
            row.checked_sub(1).map(|r| Cell::new(r, col)),
            (col + 1 < self.size).then(|| Cell::new(row, col + 1)),
            col.checked_sub(1).map(|c| Cell::new(row, c)),
        ];
        out.extend(candidates.into_iter().flatten().filter(|c| self.is_free(*c)));
        out
    }

    /// Validate both endpoints for a search run.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidEndpoint`] if either endpoint is unset, out of
    ///   bounds, or `start == goal`.
    /// - [`GridError::OccupiedEndpoint`] if either endpoint is a wall.
    pub fn endpoints(&self) -> Result<(Cell, Cell), GridError> {
        let start = self.checked_endpoint(Endpoint::Start, self.start)?;
        let goal = self.checked_endpoint(Endpoint::Goal, self.goal)?;
        if start == goal {
            return Err(GridError::InvalidEndpoint {
                endpoint: Endpoint::Goal,
                detail: format!("goal {goal} equals start"),
            });
        }
        Ok((start, goal))
    }

    fn checked_endpoint(&self, endpoint: Endpoint, cell: Option<Cell>) -> Result<Cell, GridError> {
        let cell = cell.ok_or_else(|| GridError::InvalidEndpoint {
            endpoint,
            detail: "not set".into(),
        })?;
        if !self.in_bounds(cell) {
            return Err(GridError::InvalidEndpoint {
                endpoint,
                detail: format!("{cell} is outside the {0}x{0} grid", self.size),
            });
        }
        if self.is_wall(cell) {
            return Err(GridError::OccupiedEndpoint { endpoint, cell });
        }
        Ok(cell)
    }

    pub(crate) fn require_in_bounds(&self, cell: Cell) -> Result<usize, GridError> {
        self.index_of(cell).ok_or(GridError::OutOfBounds {
            cell,
            size: self.size,
        })
    }

    /// Which endpoint, if any, occupies `cell`.
    #[must_use]
    pub fn endpoint_at(&self, cell: Cell) -> Option<Endpoint> {
        if self.start == Some(cell) {
            Some(Endpoint::Start)
        } else if self.goal == Some(cell) {
            Some(Endpoint::Goal)
        } else {
            None
        }
    }
}
