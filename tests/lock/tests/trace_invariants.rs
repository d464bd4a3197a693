//! Frame-sequence invariants: one initial frame plus one frame per settled
//! cell, settled sets that only grow, and `f_cost` that never decreases.

use std::collections::BTreeSet;

use lock_tests::grid_helpers::{grid_from_ascii, seeded_grid};
use pathtrace_kernel::grid::{Cell, Endpoint, GridError};
use pathtrace_search::{
    reconstruct_partial_path, run, run_with_policy, SearchError, SearchPolicy, TerminationReason,
    TraceError,
};

#[test]
fn frame_count_is_settled_count_plus_one() {
    for seed in 0..10 {
        let grid = seeded_grid(12, 0.25, seed);
        let result = run(&grid).unwrap();
        let last = result.trace.last().unwrap();
        assert_eq!(result.frames().len(), last.visited.len() + 1, "seed {seed}");
        assert!(result.frame_at(0).unwrap().is_initial());
        assert!(result.frames()[1..].iter().all(|f| f.current.is_some()));
    }
}

#[test]
fn visited_grows_by_exactly_the_current_cell() {
    let grid = seeded_grid(14, 0.3, 3);
    let result = run(&grid).unwrap();
    for pair in result.frames().windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        assert_eq!(after.visited.len(), before.visited.len() + 1);
        assert_eq!(after.visited[..before.visited.len()], before.visited[..]);
        assert_eq!(after.visited.last().copied(), after.current);
    }
}

#[test]
fn frontier_and_visited_are_disjoint_and_sorted() {
    let grid = seeded_grid(14, 0.3, 11);
    let result = run(&grid).unwrap();
    for frame in result.frames() {
        let visited: BTreeSet<Cell> = frame.visited.iter().copied().collect();
        assert_eq!(visited.len(), frame.visited.len(), "a cell was settled twice");
        assert!(frame.frontier.iter().all(|c| !visited.contains(c)));
        assert!(frame.frontier.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn f_cost_never_decreases() {
    for seed in 0..10 {
        let grid = seeded_grid(20, 0.3, seed);
        let result = run(&grid).unwrap();
        let f: Vec<u64> = result.frames().iter().filter_map(|fr| fr.f_cost).collect();
        assert!(f.windows(2).all(|w| w[0] <= w[1]), "seed {seed}: {f:?}");
    }
}

#[test]
fn partial_path_of_final_frame_is_the_path() {
    let grid = grid_from_ascii(&["S...", ".##.", "....", "...G"]);
    let result = run(&grid).unwrap();
    let last = result.trace.last().unwrap();
    assert_eq!(reconstruct_partial_path(last, result.start), result.path);

    for frame in &result.frames()[1..] {
        let partial = reconstruct_partial_path(frame, result.start);
        assert_eq!(partial.first(), Some(&result.start));
        assert_eq!(partial.last().copied(), frame.current);
        assert_eq!(Some((partial.len() - 1) as u64), frame.g_cost);
    }
}

#[test]
fn frame_at_out_of_range() {
    let grid = grid_from_ascii(&["SG", ".."]);
    let result = run(&grid).unwrap();
    let len = result.frames().len();
    assert_eq!(
        result.frame_at(len),
        Err(TraceError::OutOfRange { index: len, len })
    );
}

#[test]
fn step_limit_keeps_recorded_frames() {
    let grid = seeded_grid(20, 0.0, 0);
    let result = run_with_policy(&grid, &SearchPolicy { max_steps: 10 }).unwrap();
    assert_eq!(result.termination, TerminationReason::StepLimitExceeded { limit: 10 });
    assert!(result.path.is_empty());
    assert_eq!(result.stats.pops, 10);
    assert_eq!(
        result.frames().len() as u64,
        1 + result.stats.pops - result.stats.stale_discarded
    );
}

#[test]
fn stale_pops_never_produce_frames() {
    let mut grids_with_stale = 0;
    for size in 4..20 {
        for seed in 0..60 {
            let grid = seeded_grid(size, 0.3, seed);
            let result = run(&grid).unwrap();
            let stats = result.stats;
            if stats.stale_discarded == 0 {
                continue;
            }
            grids_with_stale += 1;
            assert_eq!(
                result.frames().len() as u64,
                1 + stats.pops - stats.stale_discarded,
                "size {size} seed {seed}"
            );
            let mut seen = BTreeSet::new();
            for cell in result.frames().iter().filter_map(|f| f.current) {
                assert!(seen.insert(cell), "size {size} seed {seed}: {cell} settled twice");
            }
        }
    }
    assert!(grids_with_stale > 0, "no seeded grid produced a stale pop");
}

#[test]
fn endpoint_errors_produce_no_frames() {
    let mut grid = grid_from_ascii(&["...", "...", "..."]);
    assert!(matches!(
        run(&grid),
        Err(SearchError::Grid(GridError::InvalidEndpoint {
            endpoint: Endpoint::Start,
            ..
        }))
    ));

    grid.set_start(Cell::new(1, 1)).unwrap();
    assert!(matches!(
        grid.set_goal(Cell::new(1, 1)),
        Err(GridError::InvalidEndpoint {
            endpoint: Endpoint::Goal,
            ..
        })
    ));

    grid.set_goal(Cell::new(2, 2)).unwrap();
    grid.clear();
    assert!(matches!(run(&grid), Err(SearchError::Grid(_))));
}
