//! Frames: immutable snapshots of search progress at one pop event.
//!
//! A frame carries everything a player needs to render that instant without
//! re-running the search: the settled cells in settlement order, the open
//! cells, and the predecessor links for partial-path reconstruction.

use std::collections::BTreeMap;

use pathtrace_kernel::grid::Cell;

/// One recorded step of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Cell popped this step; `None` for the initial frame.
    pub current: Option<Cell>,
    /// Settled cells, in the order they were settled.
    pub visited: Vec<Cell>,
    /// Open cells, row-major.
    pub frontier: Vec<Cell>,
    /// Best-known predecessor of every discovered cell.
    pub parent_links: BTreeMap<Cell, Cell>,
    /// Cost-so-far of `current`.
    pub g_cost: Option<u64>,
    /// `g + h` of `current`.
    pub f_cost: Option<u64>,
}

impl Frame {
    /// Whether this is the pre-loop frame.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.current.is_none()
    }

    /// JSON form with cells as row-major indexes on a `size × size` grid.
    ///
    /// `parent_links` becomes a list of `[cell, parent]` pairs in ascending
    /// cell order.
    #[must_use]
    pub fn to_json_value(&self, size: usize) -> serde_json::Value {
        let index = |c: &Cell| c.row * size + c.col;
        serde_json::json!({
            "current": self.current.as_ref().map(index),
            "f_cost": self.f_cost,
            "frontier": self.frontier.iter().map(index).collect::<Vec<_>>(),
            "g_cost": self.g_cost,
            "parent_links": self
                .parent_links
                .iter()
                .map(|(cell, parent)| [index(cell), index(parent)])
                .collect::<Vec<_>>(),
            "visited": self.visited.iter().map(index).collect::<Vec<_>>(),
        })
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The goal was popped; the path is non-empty.
    GoalReached,
    /// The heap emptied without reaching the goal.
    FrontierExhausted,
    /// The pop budget ran out; the path is empty.
    StepLimitExceeded { limit: u64 },
}

impl TerminationReason {
    /// Stable snake-case tag for serialization and fixture output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoalReached => "goal_reached",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::StepLimitExceeded { .. } => "step_limit_exceeded",
        }
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::StepLimitExceeded { limit } => {
                serde_json::json!({"limit": limit, "type": self.as_str()})
            }
            _ => serde_json::json!({"type": self.as_str()}),
        }
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Heap pops, stale ones included.
    pub pops: u64,
    /// Pops discarded because the cell had left the open set.
    pub stale_discarded: u64,
    /// Largest open-set size observed.
    pub frontier_high_water: usize,
}

impl SearchStats {
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "frontier_high_water": self.frontier_high_water,
            "pops": self.pops,
            "stale_discarded": self.stale_discarded,
        })
    }
}
