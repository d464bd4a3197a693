//! Shared grid builders for the pathtrace benchmark suites.

use pathtrace_kernel::grid::{Cell, Grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Obstacle regimes exercised by the grid benches.
#[derive(Debug, Clone, Copy)]
pub enum Regime {
    /// No walls: the heuristic is exact and the frontier stays narrow.
    Open,
    /// Seeded random walls at the given density.
    Random { density: f64, seed: u64 },
    /// Vertical walls with alternating gaps: long detours, many ties.
    Serpentine,
}

impl Regime {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Open => "open".into(),
            Self::Random { density, seed } => format!("random_{density}_{seed}"),
            Self::Serpentine => "serpentine".into(),
        }
    }
}

/// `size × size` grid, start top-left, goal bottom-right.
///
/// # Panics
///
/// Panics if `size < 2`. Benchmark setup failures are fatal.
#[must_use]
pub fn build_grid(size: usize, regime: Regime) -> Grid {
    let mut grid = Grid::new(size).expect("size must be non-zero");
    grid.set_start(Cell::new(0, 0)).expect("start in bounds");
    grid.set_goal(Cell::new(size - 1, size - 1))
        .expect("goal in bounds and distinct");
    match regime {
        Regime::Open => {}
        Regime::Random { density, seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            grid.randomize(density, &mut rng).expect("density is not NaN");
        }
        Regime::Serpentine => {
            let mut walls = Vec::new();
            for col in (1..size.saturating_sub(1)).step_by(2) {
                let gap = if (col / 2) % 2 == 0 { size - 1 } else { 0 };
                walls.extend((0..size).filter(|&r| r != gap).map(|r| Cell::new(r, col)));
            }
            grid.bulk_set(&walls, true).expect("walls avoid endpoints");
        }
    }
    grid
}
