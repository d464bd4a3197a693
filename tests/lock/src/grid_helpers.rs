//! Grid builders and a brute-force reference distance.
//!
//! ASCII grids use one character per cell: `.` free, `#` wall, `S` start,
//! `G` goal. Rows must all have the same length as the row count.

use std::collections::VecDeque;

use pathtrace_kernel::grid::{Cell, Grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build a grid from ASCII rows.
///
/// # Panics
///
/// Panics on a non-square layout or an unknown character. Test-only input.
#[must_use]
pub fn grid_from_ascii(rows: &[&str]) -> Grid {
    let size = rows.len();
    let mut grid = Grid::new(size).unwrap();
    let mut walls = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        assert_eq!(line.chars().count(), size, "row {row} is not {size} wide");
        for (col, ch) in line.chars().enumerate() {
            let cell = Cell::new(row, col);
            match ch {
                '.' => {}
                '#' => walls.push(cell),
                'S' => grid.set_start(cell).unwrap(),
                'G' => grid.set_goal(cell).unwrap(),
                other => panic!("unknown grid character {other:?}"),
            }
        }
    }
    grid.bulk_set(&walls, true).unwrap();
    grid
}

/// `size × size` grid with start at the top-left, goal at the bottom-right,
/// and walls drawn from a seeded RNG.
///
/// # Panics
///
/// Panics if `size < 2`.
#[must_use]
pub fn seeded_grid(size: usize, density: f64, seed: u64) -> Grid {
    let mut grid = Grid::new(size).unwrap();
    grid.set_start(Cell::new(0, 0)).unwrap();
    grid.set_goal(Cell::new(size - 1, size - 1)).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    grid.randomize(density, &mut rng).unwrap();
    grid
}

/// Shortest start→goal distance by plain breadth-first search.
///
/// `None` when the goal is unreachable or an endpoint is unset.
#[must_use]
pub fn bfs_distance(grid: &Grid) -> Option<u64> {
    let (start, goal) = grid.endpoints().ok()?;
    let mut dist: Vec<Option<u64>> = vec![None; grid.cell_count()];
    let mut queue = VecDeque::new();
    dist[grid.index_of(start)?] = Some(0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let d = dist[grid.index_of(cell)?]?;
        if cell == goal {
            return Some(d);
        }
        for next in grid.neighbors(cell) {
            let i = grid.index_of(next)?;
            if dist[i].is_none() {
                dist[i] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Every free cell reachable from the start, by breadth-first search.
#[must_use]
pub fn reachable_cells(grid: &Grid) -> Vec<Cell> {
    let Some(start) = grid.start() else {
        return Vec::new();
    };
    let mut seen = vec![false; grid.cell_count()];
    let mut out = Vec::new();
    let mut queue = VecDeque::from([start]);
    if let Some(i) = grid.index_of(start) {
        seen[i] = true;
    }
    while let Some(cell) = queue.pop_front() {
        out.push(cell);
        for next in grid.neighbors(cell) {
            if let Some(i) = grid.index_of(next) {
                if !seen[i] {
                    seen[i] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    out.sort();
    out
}
