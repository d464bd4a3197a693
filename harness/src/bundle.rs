//! In-memory run bundle: the persisted form of one search run.
//!
//! No file I/O in this module. See [`crate::bundle_dir`] for disk layout.
//!
//! # Artifacts
//!
//! | Name         | Content                                          |
//! |--------------|--------------------------------------------------|
//! | `grid.json`  | canonical grid snapshot                          |
//! | `trace.json` | canonical frame sequence                         |
//! | `path.json`  | final path, termination reason and counters      |
//! | `policy.json`| budget the run was executed under                |
//!
//! Every artifact is canonical JSON. The bundle digest is computed over the
//! manifest: a canonical JSON list of `(name, content_hash)` pairs.

use std::collections::BTreeMap;

use pathtrace_kernel::grid::Grid;
use pathtrace_kernel::proof::canon::canonical_json_bytes;
use pathtrace_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use pathtrace_search::{run_with_policy, SearchPolicy, SearchResult};

pub const GRID_ARTIFACT: &str = "grid.json";
pub const TRACE_ARTIFACT: &str = "trace.json";
pub const PATH_ARTIFACT: &str = "path.json";
pub const POLICY_ARTIFACT: &str = "policy.json";

const REQUIRED_ARTIFACTS: [&str; 4] = [GRID_ARTIFACT, TRACE_ARTIFACT, PATH_ARTIFACT, POLICY_ARTIFACT];

/// Manifest schema tag.
pub const MANIFEST_SCHEMA: &str = "pathtrace.run.v1";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifact {
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(RunArtifact, content)`.
    pub content_hash: ContentHash,
}

impl RunArtifact {
    fn new(name: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_hash: canonical_hash(HashDomain::RunArtifact, &content),
            content,
        }
    }
}

/// The artifacts of one run plus their manifest and digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBundle {
    /// Artifacts by name, sorted.
    pub artifacts: BTreeMap<String, RunArtifact>,
    /// Canonical JSON listing every artifact with its hash.
    pub manifest: Vec<u8>,
    /// `canonical_hash(RunDigest, manifest)`.
    pub digest: ContentHash,
}

impl RunBundle {
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&RunArtifact> {
        self.artifacts.get(name)
    }

    /// Parse `grid.json` back into a [`Grid`].
    ///
    /// # Errors
    ///
    /// [`RunBundleError::MissingArtifact`] or [`RunBundleError::Parse`].
    pub fn grid(&self) -> Result<Grid, RunBundleError> {
        let value = self.artifact_json(GRID_ARTIFACT)?;
        Grid::from_json_value(&value).map_err(|e| RunBundleError::Parse {
            artifact: GRID_ARTIFACT.into(),
            detail: e.to_string(),
        })
    }

    /// Parse `policy.json` back into a [`SearchPolicy`].
    ///
    /// # Errors
    ///
    /// [`RunBundleError::MissingArtifact`] or [`RunBundleError::Parse`].
    pub fn policy(&self) -> Result<SearchPolicy, RunBundleError> {
        let artifact = self
            .artifact(POLICY_ARTIFACT)
            .ok_or_else(|| RunBundleError::MissingArtifact {
                name: POLICY_ARTIFACT.into(),
            })?;
        SearchPolicy::from_json_bytes(&artifact.content).map_err(|e| RunBundleError::Parse {
            artifact: POLICY_ARTIFACT.into(),
            detail: e.to_string(),
        })
    }

    fn artifact_json(&self, name: &str) -> Result<serde_json::Value, RunBundleError> {
        let artifact = self
            .artifact(name)
            .ok_or_else(|| RunBundleError::MissingArtifact { name: name.into() })?;
        serde_json::from_slice(&artifact.content).map_err(|e| RunBundleError::Parse {
            artifact: name.into(),
            detail: e.to_string(),
        })
    }
}

/// Error building or verifying a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunBundleError {
    /// Canonical JSON serialization failed.
    Canon { detail: String },
    MissingArtifact { name: String },
    Parse { artifact: String, detail: String },
    /// An artifact's stored hash does not match its content.
    ContentHashMismatch {
        name: String,
        stored: String,
        recomputed: String,
    },
    /// Stored manifest bytes differ from the manifest rebuilt from artifacts.
    ManifestMismatch,
    DigestMismatch { stored: String, recomputed: String },
    /// Re-running the search on `grid.json` produced different artifacts.
    ReplayDivergence { artifact: String },
    /// Re-running the search on `grid.json` failed pre-flight.
    ReplayFailed { detail: String },
}

impl std::fmt::Display for RunBundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::Parse { artifact, detail } => write!(f, "{artifact} parse error: {detail}"),
            Self::ContentHashMismatch {
                name,
                stored,
                recomputed,
            } => write!(
                f,
                "content hash mismatch for {name}: stored={stored}, recomputed={recomputed}"
            ),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
            Self::ReplayDivergence { artifact } => write!(f, "replay diverged at {artifact}"),
            Self::ReplayFailed { detail } => write!(f, "replay failed: {detail}"),
        }
    }
}

impl std::error::Error for RunBundleError {}

fn canon(value: &serde_json::Value) -> Result<Vec<u8>, RunBundleError> {
    canonical_json_bytes(value).map_err(|e| RunBundleError::Canon {
        detail: e.to_string(),
    })
}

/// JSON form of `path.json`.
fn path_json(grid: &Grid, result: &SearchResult) -> serde_json::Value {
    let path: Vec<usize> = result
        .path
        .iter()
        .filter_map(|&c| grid.index_of(c))
        .collect();
    serde_json::json!({
        "cost": result.path_cost(),
        "path": path,
        "stats": result.stats.to_json_value(),
        "termination": result.termination.to_json_value(),
    })
}

/// Package `grid` and the `result` of searching it.
///
/// # Errors
///
/// Returns [`RunBundleError::Canon`] if canonical JSON serialization fails.
pub fn build_run_bundle(grid: &Grid, result: &SearchResult) -> Result<RunBundle, RunBundleError> {
    let artifacts = [
        RunArtifact::new(GRID_ARTIFACT, canon(&grid.to_json_value())?),
        RunArtifact::new(TRACE_ARTIFACT, canon(&result.trace.to_json_value())?),
        RunArtifact::new(PATH_ARTIFACT, canon(&path_json(grid, result))?),
        RunArtifact::new(POLICY_ARTIFACT, canon(&result.policy.to_json_value())?),
    ];
    assemble(artifacts.into_iter().map(|a| (a.name.clone(), a)).collect())
}

pub(crate) fn assemble(artifacts: BTreeMap<String, RunArtifact>) -> Result<RunBundle, RunBundleError> {
    let manifest = compute_manifest_bytes(&artifacts)?;
    let digest = canonical_hash(HashDomain::RunDigest, &manifest);
    Ok(RunBundle {
        artifacts,
        manifest,
        digest,
    })
}

fn compute_manifest_bytes(artifacts: &BTreeMap<String, RunArtifact>) -> Result<Vec<u8>, RunBundleError> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();
    canon(&serde_json::json!({
        "artifacts": entries,
        "schema_version": MANIFEST_SCHEMA,
    }))
}

/// Integrity check: hashes, manifest and digest agree with the content.
///
/// # Errors
///
/// Returns the first [`RunBundleError`] encountered.
pub fn verify_run_bundle(bundle: &RunBundle) -> Result<(), RunBundleError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(HashDomain::RunArtifact, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(RunBundleError::ContentHashMismatch {
                name: artifact.name.clone(),
                stored: artifact.content_hash.as_str().to_string(),
                recomputed: recomputed.as_str().to_string(),
            });
        }
    }
    for name in REQUIRED_ARTIFACTS {
        if !bundle.artifacts.contains_key(name) {
            return Err(RunBundleError::MissingArtifact { name: name.into() });
        }
    }
    if compute_manifest_bytes(&bundle.artifacts)? != bundle.manifest {
        return Err(RunBundleError::ManifestMismatch);
    }
    let recomputed = canonical_hash(HashDomain::RunDigest, &bundle.manifest);
    if recomputed != bundle.digest {
        return Err(RunBundleError::DigestMismatch {
            stored: bundle.digest.as_str().to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

/// Re-run the search on the bundled grid under the bundled policy and
/// require byte-identical `trace.json` and `path.json`.
///
/// # Errors
///
/// Integrity errors from [`verify_run_bundle`], then
/// [`RunBundleError::ReplayFailed`] or [`RunBundleError::ReplayDivergence`].
pub fn replay_run_bundle(bundle: &RunBundle) -> Result<(), RunBundleError> {
    verify_run_bundle(bundle)?;
    let grid = bundle.grid()?;
    let policy = bundle.policy()?;

    let result = run_with_policy(&grid, &policy).map_err(|e| {
        RunBundleError::ReplayFailed {
            detail: e.to_string(),
        }
    })?;
    let replayed = build_run_bundle(&grid, &result)?;

    for name in [TRACE_ARTIFACT, PATH_ARTIFACT] {
        let stored = bundle.artifact(name).map(|a| &a.content_hash);
        let fresh = replayed.artifact(name).map(|a| &a.content_hash);
        if stored != fresh {
            tracing::warn!(artifact = name, "run bundle replay diverged");
            return Err(RunBundleError::ReplayDivergence {
                artifact: name.into(),
            });
        }
    }
    Ok(())
}
