//! Open frontier with lazy deletion.
//!
//! Two structures track the open set:
//!
//! - a `BinaryHeap` of `(f_cost, sequence, cell)` entries, which may hold
//!   superseded entries for the same cell;
//! - `open_membership`, a `BTreeSet<Cell>` of cells that are logically open.
//!
//! Improving a cell's cost pushes a fresh entry instead of editing the heap.
//! At pop time an entry whose cell is no longer in `open_membership` is
//! stale and is discarded without being acted on.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use pathtrace_kernel::grid::Cell;

/// The frontier ordering key: `(f_cost, sequence)`.
///
/// Lower `f_cost` first, then the older push. Sequence numbers are unique
/// per run, so the order is total and independent of heap internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub f_cost: u64,
    pub sequence: u64,
}

/// A heap entry. `BinaryHeap` is a max-heap, so the key is wrapped in
/// `Reverse` to pop the smallest key first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    cell: Cell,
}

/// Outcome of one heap pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierPop {
    /// The cell was open; it has been removed from `open_membership`.
    Live { cell: Cell, key: FrontierKey },
    /// A superseded entry; nothing changed besides the heap.
    Stale { cell: Cell, key: FrontierKey },
}

/// Best-first open set for a single run.
#[derive(Debug, Default)]
pub struct OpenFrontier {
    heap: BinaryHeap<FrontierEntry>,
    open_membership: BTreeSet<Cell>,
    next_sequence: u64,
    high_water: usize,
    stale_discarded: u64,
}

impl OpenFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `cell` with `f_cost` and mark it open.
    ///
    /// Returns the key assigned to the entry. Any earlier entry for the same
    /// cell stays in the heap and will be discarded as stale.
    pub fn push(&mut self, cell: Cell, f_cost: u64) -> FrontierKey {
        let key = FrontierKey {
            f_cost,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(FrontierEntry {
            key: Reverse(key),
            cell,
        });
        self.open_membership.insert(cell);
        self.high_water = self.high_water.max(self.open_membership.len());
        key
    }

    /// Pop the smallest entry, classifying it as live or stale.
    pub fn pop(&mut self) -> Option<FrontierPop> {
        let FrontierEntry {
            key: Reverse(key),
            cell,
        } = self.heap.pop()?;
        if self.open_membership.remove(&cell) {
            Some(FrontierPop::Live { cell, key })
        } else {
            self.stale_discarded += 1;
            Some(FrontierPop::Stale { cell, key })
        }
    }

    /// The open cells in row-major order.
    #[must_use]
    pub fn open_cells(&self) -> &BTreeSet<Cell> {
        &self.open_membership
    }

    /// Number of logically open cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open_membership.len()
    }

    /// Whether the heap has no entries left (live or stale).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of simultaneously open cells.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    #[must_use]
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }
}
