//! Binary that runs a fixed set of grids through the search and prints
//! deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: key=value lines on stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `warn`).

use lock_tests::grid_helpers::{grid_from_ascii, seeded_grid};
use pathtrace_harness::build_run_bundle;
use pathtrace_kernel::grid::Grid;
use pathtrace_search::{run_with_policy, SearchPolicy};
use tracing_subscriber::EnvFilter;

fn report(label: &str, grid: &Grid, policy: &SearchPolicy) {
    let result = run_with_policy(grid, policy).expect("search pre-flight failed");
    let bundle = build_run_bundle(grid, &result).expect("bundle build failed");
    let trace_digest = result.trace.digest().expect("trace digest failed");
    let grid_digest = grid.snapshot_digest().expect("grid digest failed");

    println!("{label}.grid_digest={}", grid_digest.as_str());
    println!("{label}.trace_digest={}", trace_digest.as_str());
    println!("{label}.bundle_digest={}", bundle.digest.as_str());
    println!("{label}.termination_reason={}", result.termination.as_str());
    println!("{label}.frame_count={}", result.frames().len());
    println!("{label}.path_len={}", result.path.len());
    println!("{label}.pops={}", result.stats.pops);
    println!("{label}.stale_discarded={}", result.stats.stale_discarded);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let policy = SearchPolicy::default();
    let policy_digest = policy.digest().expect("policy digest failed");
    println!("policy_digest={}", policy_digest.as_str());

    let open = grid_from_ascii(&["S..", "...", "..G"]);
    report("open3", &open, &policy);

    let walled = grid_from_ascii(&["S..", "###", "..G"]);
    report("walled3", &walled, &policy);

    let maze = grid_from_ascii(&[
        "S.#.....",
        ".##.###.",
        "....#...",
        "##.##.#.",
        "...#..#.",
        ".#...##.",
        ".#.#....",
        "...#.##G",
    ]);
    report("maze8", &maze, &policy);

    let random = seeded_grid(24, 0.3, 7);
    report("random24", &random, &policy);

    let open24 = seeded_grid(24, 0.0, 0);
    report("limited24", &open24, &SearchPolicy { max_steps: 40 });
}
