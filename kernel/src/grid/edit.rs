//! Grid mutations: the editing surface's side of the model.
//!
//! Every mutation validates the endpoint/wall invariant before touching any
//! cell, so a rejected call leaves the grid exactly as it was.

use rand::Rng;

use super::cell::{Cell, Endpoint};
use super::error::GridError;
use super::model::Grid;

/// Upper bound for random wall density.
pub const MAX_WALL_DENSITY: f64 = 0.6;

impl Grid {
    /// Set or clear a wall. Returns whether the cell changed.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] for a cell outside the grid.
    /// - [`GridError::OccupiedEndpoint`] when walling a start or goal cell.
    pub fn set_wall(&mut self, cell: Cell, wall: bool) -> Result<bool, GridError> {
        let index = self.require_in_bounds(cell)?;
        if wall {
            if let Some(endpoint) = self.endpoint_at(cell) {
                return Err(GridError::OccupiedEndpoint { endpoint, cell });
            }
        }
        let changed = self.walls[index] != wall;
        self.walls[index] = wall;
        Ok(changed)
    }

    /// Flip a cell between free and wall. Returns the new wall state.
    ///
    /// # Errors
    ///
    /// Same as [`Grid::set_wall`].
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<bool, GridError> {
        let wall = !self.is_wall(cell);
        self.set_wall(cell, wall)?;
        Ok(wall)
    }

    /// Set every listed cell to `wall`. All-or-nothing: each cell is
    /// validated before any is changed. Returns how many cells changed.
    ///
    /// # Errors
    ///
    /// The first failure [`Grid::set_wall`] would report for any listed cell.
    pub fn bulk_set(&mut self, cells: &[Cell], wall: bool) -> Result<usize, GridError> {
        let mut indexes = Vec::with_capacity(cells.len());
        for &cell in cells {
            let index = self.require_in_bounds(cell)?;
            if wall {
                if let Some(endpoint) = self.endpoint_at(cell) {
                    return Err(GridError::OccupiedEndpoint { endpoint, cell });
                }
            }
            indexes.push(index);
        }

        let mut changed = 0;
        for index in indexes {
            if self.walls[index] != wall {
                self.walls[index] = wall;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Re-roll every non-endpoint cell: wall with probability `density`.
    ///
    /// `density` is clamped to `[0, MAX_WALL_DENSITY]`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDensity`] for NaN.
    pub fn randomize<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) -> Result<(), GridError> {
        if density.is_nan() {
            return Err(GridError::InvalidDensity { density });
        }
        let density = density.clamp(0.0, MAX_WALL_DENSITY);
        let endpoints: Vec<usize> = [self.start, self.goal]
            .into_iter()
            .flatten()
            .filter_map(|c| self.index_of(c))
            .collect();

        for (index, wall) in self.walls.iter_mut().enumerate() {
            if endpoints.contains(&index) {
                continue;
            }
            *wall = rng.random::<f64>() < density;
        }
        Ok(())
    }

    /// Place the start cell.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidEndpoint`] if out of bounds or equal to the goal.
    /// - [`GridError::OccupiedEndpoint`] if the cell is a wall.
    pub fn set_start(&mut self, cell: Cell) -> Result<(), GridError> {
        self.check_endpoint_placement(Endpoint::Start, cell, self.goal)?;
        self.start = Some(cell);
        Ok(())
    }

    /// Place the goal cell.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidEndpoint`] if out of bounds or equal to the start.
    /// - [`GridError::OccupiedEndpoint`] if the cell is a wall.
    pub fn set_goal(&mut self, cell: Cell) -> Result<(), GridError> {
        self.check_endpoint_placement(Endpoint::Goal, cell, self.start)?;
        self.goal = Some(cell);
        Ok(())
    }

    /// Free every cell and unset both endpoints.
    pub fn clear(&mut self) {
        self.walls.iter_mut().for_each(|w| *w = false);
        self.start = None;
        self.goal = None;
    }

    fn check_endpoint_placement(
        &self,
        endpoint: Endpoint,
        cell: Cell,
        other: Option<Cell>,
    ) -> Result<(), GridError> {
        if !self.in_bounds(cell) {
            return Err(GridError::InvalidEndpoint {
                endpoint,
                detail: format!("{cell} is outside the {0}x{0} grid", self.size),
            });
        }
        if other == Some(cell) {
            return Err(GridError::InvalidEndpoint {
                endpoint,
                detail: format!("{cell} is already the other endpoint"),
            });
        }
        if self.is_wall(cell) {
            return Err(GridError::OccupiedEndpoint { endpoint, cell });
        }
        Ok(())
    }
}
