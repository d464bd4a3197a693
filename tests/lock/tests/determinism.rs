//! In-process determinism: repeated runs over an unmodified grid produce
//! identical frames, identical trace digests and identical bundle digests.

use lock_tests::grid_helpers::{grid_from_ascii, seeded_grid};
use pathtrace_harness::build_run_bundle;
use pathtrace_kernel::grid::Grid;
use pathtrace_search::run;

#[test]
fn repeated_runs_are_identical_n10() {
    let grid = seeded_grid(30, 0.3, 99);
    let first = run(&grid).unwrap();
    let first_digest = first.trace.digest().unwrap();
    for _ in 1..10 {
        let again = run(&grid).unwrap();
        assert_eq!(again, first);
        assert_eq!(again.trace.digest().unwrap(), first_digest);
    }
}

#[test]
fn run_does_not_mutate_grid() {
    let grid = seeded_grid(16, 0.3, 5);
    let before = grid.snapshot_digest().unwrap();
    let _ = run(&grid).unwrap();
    assert_eq!(grid.snapshot_digest().unwrap(), before);
}

#[test]
fn snapshot_roundtrip_reproduces_trace() {
    let grid = seeded_grid(18, 0.3, 21);
    let restored = Grid::from_json_value(&grid.to_json_value()).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(
        run(&restored).unwrap().trace.digest().unwrap(),
        run(&grid).unwrap().trace.digest().unwrap()
    );
}

#[test]
fn bundle_digest_stable_across_runs() {
    let grid = grid_from_ascii(&["S...", ".#..", ".#..", "...G"]);
    let a = build_run_bundle(&grid, &run(&grid).unwrap()).unwrap();
    let b = build_run_bundle(&grid, &run(&grid).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_grids_give_different_trace_digests() {
    let a = grid_from_ascii(&["S...", "....", "....", "...G"]);
    let b = grid_from_ascii(&["S...", ".#..", "....", "...G"]);
    assert_ne!(
        run(&a).unwrap().trace.digest().unwrap(),
        run(&b).unwrap().trace.digest().unwrap()
    );
}

#[test]
fn concurrent_runs_share_no_state() {
    let grid = seeded_grid(24, 0.3, 8);
    let expected = run(&grid).unwrap().trace.digest().unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let grid = grid.clone();
            std::thread::spawn(move || run(&grid).unwrap().trace.digest().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
