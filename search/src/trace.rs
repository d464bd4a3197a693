//! Trace recording and random-access playback reads.
//!
//! [`TraceRecorder`] is append-only during a run and is consumed into an
//! immutable [`Trace`] when the run returns. Frame 0 is always the pre-loop
//! state; every later frame corresponds to exactly one non-stale pop.

use std::collections::{BTreeMap, BTreeSet};

use pathtrace_kernel::grid::Cell;
use pathtrace_kernel::proof::canon::{canonical_json_bytes, CanonError};
use pathtrace_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::TraceError;
use crate::frame::Frame;

/// Append-only frame sink owned by a single run.
#[derive(Debug)]
pub struct TraceRecorder {
    grid_size: usize,
    frames: Vec<Frame>,
}

impl TraceRecorder {
    #[must_use]
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            frames: Vec::new(),
        }
    }

    /// Snapshot the search state into one immutable frame.
    ///
    /// `g_cost`/`f_cost` are the costs of `current` and must be `None`
    /// exactly when `current` is.
    pub fn record(
        &mut self,
        current: Option<Cell>,
        closed: &[Cell],
        open: &BTreeSet<Cell>,
        parent: &BTreeMap<Cell, Cell>,
        g_cost: Option<u64>,
        f_cost: Option<u64>,
    ) {
        self.frames.push(Frame {
            current,
            visited: closed.to_vec(),
            frontier: open.iter().copied().collect(),
            parent_links: parent.clone(),
            g_cost,
            f_cost,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Trace {
        Trace {
            grid_size: self.grid_size,
            frames: self.frames,
        }
    }
}

/// The complete, immutable frame sequence of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    grid_size: usize,
    frames: Vec<Frame>,
}

impl Trace {
    /// Random-access read.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OutOfRange`] unless `index < len()`.
    pub fn frame_at(&self, index: usize) -> Result<&Frame, TraceError> {
        self.frames.get(index).ok_or(TraceError::OutOfRange {
            index,
            len: self.frames.len(),
        })
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "frames": self
                .frames
                .iter()
                .map(|f| f.to_json_value(self.grid_size))
                .collect::<Vec<_>>(),
            "grid_size": self.grid_size,
        })
    }

    /// Canonical JSON bytes of the whole trace.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash over the canonical trace bytes.
    ///
    /// Two runs over the same grid produce the same digest; this is the
    /// witness for bit-for-bit replay.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(
            HashDomain::SearchTrace,
            &self.to_canonical_json_bytes()?,
        ))
    }
}

/// Walk `parent_links` back from `end` until `start`, then reverse.
///
/// Returns `[start, ..., end]`. Returns an empty vector if the chain breaks
/// before reaching `start` or revisits a cell.
#[must_use]
pub fn reconstruct_path(parent_links: &BTreeMap<Cell, Cell>, start: Cell, end: Cell) -> Vec<Cell> {
    let mut path = vec![end];
    let mut cursor = end;
    while cursor != start {
        let Some(&prev) = parent_links.get(&cursor) else {
            return Vec::new();
        };
        // A well-formed chain has at most one link per discovered cell.
        if path.len() > parent_links.len() {
            return Vec::new();
        }
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

/// The current best-guess route of a frame: `start` to `frame.current`.
///
/// Empty for the initial frame.
#[must_use]
pub fn reconstruct_partial_path(frame: &Frame, start: Cell) -> Vec<Cell> {
    match frame.current {
        Some(current) => reconstruct_path(&frame.parent_links, start, current),
        None => Vec::new(),
    }
}
