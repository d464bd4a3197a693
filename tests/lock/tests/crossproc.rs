//! Cross-process determinism: spawns the `search_fixture` binary under
//! four environment variants and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    env!("CARGO_BIN_EXE_search_fixture").to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("policy_digest=sha256:"));
    assert!(baseline.contains("open3.trace_digest=sha256:"));
    assert!(baseline.contains("open3.termination_reason=goal_reached"));
    assert!(baseline.contains("open3.path_len=5"));
    assert!(baseline.contains("walled3.termination_reason=frontier_exhausted"));
    assert!(baseline.contains("walled3.frame_count=4"));
    assert!(baseline.contains("limited24.termination_reason=step_limit_exceeded"));

    // Different cwd.
    let alt_cwd = if cfg!(target_os = "windows") {
        "C:\\"
    } else {
        "/tmp"
    };
    let variant_cwd = run_variant(alt_cwd, &[]);
    assert_eq!(
        baseline, variant_cwd,
        "output differs when cwd changes from {root} to {alt_cwd}"
    );

    // Different locale env.
    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    // Verbose logging goes to stderr only.
    let variant_noise = run_variant(
        &root,
        &[
            ("RUST_LOG", "trace"),
            ("TZ", "America/New_York"),
            ("HOME", "/nonexistent"),
        ],
    );
    assert_eq!(
        baseline, variant_noise,
        "output differs with spurious env vars or verbose logging"
    );
}
