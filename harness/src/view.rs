//! Presentation payload: per-cell state codes and the frame being shown.
//!
//! # Cell codes
//!
//! | Code | State      |
//! |------|------------|
//! | 0    | `Free`     |
//! | 1    | `Wall`     |
//! | 2    | `Start`    |
//! | 3    | `Goal`     |
//! | 4    | `Visited`  |
//! | 5    | `Frontier` |
//!
//! Precedence when a cell qualifies for several states:
//! `Start`/`Goal` > `Wall` > `Visited` > `Frontier` > `Free`.

use pathtrace_kernel::grid::{Cell, Endpoint, Grid};
use pathtrace_search::{reconstruct_partial_path, Frame, SearchResult};

use crate::playback::PlaybackCursor;

/// Render state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Free,
    Wall,
    Start,
    Goal,
    Visited,
    Frontier,
}

impl CellState {
    /// Stable numeric code used by the presentation layer.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Wall => 1,
            Self::Start => 2,
            Self::Goal => 3,
            Self::Visited => 4,
            Self::Frontier => 5,
        }
    }
}

/// Row-major cell states for `grid`, overlaid with `frame` if given.
#[must_use]
pub fn render_cells(grid: &Grid, frame: Option<&Frame>) -> Vec<CellState> {
    let mut cells: Vec<CellState> = (0..grid.cell_count())
        .map(|i| match grid.cell_at(i) {
            Some(c) if grid.is_wall(c) => CellState::Wall,
            _ => CellState::Free,
        })
        .collect();

    if let Some(frame) = frame {
        overlay(grid, &mut cells, &frame.frontier, CellState::Frontier);
        overlay(grid, &mut cells, &frame.visited, CellState::Visited);
    }

    for (endpoint, cell) in [(Endpoint::Start, grid.start()), (Endpoint::Goal, grid.goal())] {
        if let Some(index) = cell.and_then(|c| grid.index_of(c)) {
            cells[index] = match endpoint {
                Endpoint::Start => CellState::Start,
                Endpoint::Goal => CellState::Goal,
            };
        }
    }
    cells
}

fn overlay(grid: &Grid, cells: &mut [CellState], from: &[Cell], state: CellState) {
    for index in from.iter().filter_map(|&c| grid.index_of(c)) {
        if cells[index] != CellState::Wall {
            cells[index] = state;
        }
    }
}

/// Everything a renderer needs for one instant of playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub size: usize,
    pub cells: Vec<CellState>,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
    /// Final path of the run, empty before a run or when unreachable.
    pub path: Vec<Cell>,
    /// `None` when there is no result to play back.
    pub frame_index: Option<usize>,
    pub frame_count: usize,
    pub current: Option<Cell>,
    pub g_cost: Option<u64>,
    pub f_cost: Option<u64>,
    /// Route from start to `current` in the shown frame.
    pub partial_path: Vec<Cell>,
    /// Termination tag of the run, if any.
    pub termination: Option<&'static str>,
}

impl GridView {
    /// Build the view for `grid`, optionally positioned in `result` by
    /// `cursor`. Without a cursor the view shows frame 0.
    #[must_use]
    pub fn build(
        grid: &Grid,
        result: Option<&SearchResult>,
        cursor: Option<&PlaybackCursor>,
    ) -> Self {
        let frame_index = result.map(|_| cursor.map_or(0, PlaybackCursor::index));
        let frame = result
            .zip(frame_index)
            .and_then(|(r, i)| r.frame_at(i).ok());

        Self {
            size: grid.size(),
            cells: render_cells(grid, frame),
            start: grid.start(),
            goal: grid.goal(),
            path: result.map(|r| r.path.clone()).unwrap_or_default(),
            frame_index,
            frame_count: result.map_or(0, |r| r.frames().len()),
            current: frame.and_then(|f| f.current),
            g_cost: frame.and_then(|f| f.g_cost),
            f_cost: frame.and_then(|f| f.f_cost),
            partial_path: match (frame, result) {
                (Some(f), Some(r)) => reconstruct_partial_path(f, r.start),
                _ => Vec::new(),
            },
            termination: result.map(|r| r.termination.as_str()),
        }
    }

    /// Cell codes in row-major order.
    #[must_use]
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.code()).collect()
    }

    /// JSON payload with cells as row-major indexes.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let index = |c: &Cell| c.row * self.size + c.col;
        serde_json::json!({
            "cells": self.codes(),
            "current": self.current.as_ref().map(index),
            "f_cost": self.f_cost,
            "frame_count": self.frame_count,
            "frame_index": self.frame_index,
            "g_cost": self.g_cost,
            "goal": self.goal.as_ref().map(index),
            "partial_path": self.partial_path.iter().map(index).collect::<Vec<_>>(),
            "path": self.path.iter().map(index).collect::<Vec<_>>(),
            "size": self.size,
            "start": self.start.as_ref().map(index),
            "termination": self.termination,
        })
    }
}
