//! Canonical JSON snapshot of a grid.
//!
//! ```text
//! {"goal": idx|null, "size": n, "start": idx|null, "walls": [idx, ...]}
//! ```
//!
//! Cells are row-major linear indexes; `walls` is ascending.

use crate::proof::canon::canonical_json_bytes;
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

use super::cell::Cell;
use super::error::GridError;
use super::model::Grid;

impl Grid {
    /// JSON snapshot of occupancy and endpoints.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let walls: Vec<usize> = self
            .walls
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.then_some(i))
            .collect();
        serde_json::json!({
            "goal": self.goal.and_then(|c| self.index_of(c)),
            "size": self.size,
            "start": self.start.and_then(|c| self.index_of(c)),
            "walls": walls,
        })
    }

    /// Rebuild a grid from [`Grid::to_json_value`] output.
    ///
    /// Endpoints are placed through the normal mutation path, so a snapshot
    /// that violates the wall/endpoint invariant is rejected.
    ///
    /// # Errors
    ///
    /// [`GridError::Snapshot`] for missing or mistyped fields, plus any error
    /// the equivalent mutations would report.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, GridError> {
        let size = json_usize(value, "size")?;
        let mut grid = Self::new(size)?;

        let walls = value["walls"]
            .as_array()
            .ok_or_else(|| GridError::Snapshot {
                detail: "\"walls\" is not an array".into(),
            })?;
        let mut cells = Vec::with_capacity(walls.len());
        for w in walls {
            let index = w.as_u64().ok_or_else(|| GridError::Snapshot {
                detail: format!("wall entry is not an index: {w}"),
            })?;
            cells.push(grid.snapshot_cell(index)?);
        }
        grid.bulk_set(&cells, true)?;

        if let Some(start) = optional_index(value, "start")? {
            let cell = grid.snapshot_cell(start)?;
            grid.set_start(cell)?;
        }
        if let Some(goal) = optional_index(value, "goal")? {
            let cell = grid.snapshot_cell(goal)?;
            grid.set_goal(cell)?;
        }
        Ok(grid)
    }

    /// Canonical JSON bytes of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Snapshot`] if canonicalization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, GridError> {
        canonical_json_bytes(&self.to_json_value()).map_err(|e| GridError::Snapshot {
            detail: e.to_string(),
        })
    }

    /// Content hash of the canonical snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Grid::to_canonical_json_bytes`].
    pub fn snapshot_digest(&self) -> Result<ContentHash, GridError> {
        Ok(canonical_hash(
            HashDomain::GridSnapshot,
            &self.to_canonical_json_bytes()?,
        ))
    }

    fn snapshot_cell(&self, index: u64) -> Result<Cell, GridError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.cell_at(i))
            .ok_or_else(|| GridError::Snapshot {
                detail: format!("index {index} is outside the {0}x{0} grid", self.size),
            })
    }
}

fn json_usize(value: &serde_json::Value, field: &str) -> Result<usize, GridError> {
    value[field]
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| GridError::Snapshot {
            detail: format!("\"{field}\" is missing or not an unsigned integer"),
        })
}

fn optional_index(value: &serde_json::Value, field: &str) -> Result<Option<u64>, GridError> {
    match &value[field] {
        serde_json::Value::Null => Ok(None),
        v => v.as_u64().map(Some).ok_or_else(|| GridError::Snapshot {
            detail: format!("\"{field}\" is not an index"),
        }),
    }
}
