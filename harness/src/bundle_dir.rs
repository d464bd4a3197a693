//! Run directory persistence: write/read a [`RunBundle`] to/from disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   run_manifest.json    canonical JSON, artifact names and hashes
//!   run_digest.txt       ASCII digest string ("sha256:...")
//!   grid.json
//!   trace.json
//!   path.json
//!   policy.json
//! ```
//!
//! The directory path is never part of any hash. Reading is fail-closed:
//! a missing declared file, an undeclared extra file, a hash mismatch or a
//! digest mismatch is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use pathtrace_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::bundle::{verify_run_bundle, RunArtifact, RunBundle, RunBundleError, MANIFEST_SCHEMA};

const MANIFEST_FILENAME: &str = "run_manifest.json";
const DIGEST_FILENAME: &str = "run_digest.txt";
const METADATA_FILENAMES: &[&str] = &[MANIFEST_FILENAME, DIGEST_FILENAME];
const TEMP_PREFIX: &str = ".tmp_";

/// Error writing or reading a run directory.
#[derive(Debug)]
pub enum RunDirError {
    Io { detail: String },
    MissingMetadata { filename: String },
    MissingArtifact { name: String },
    /// A file in the directory is not declared by the manifest.
    ExtraFile { name: String },
    ManifestParse { detail: String },
    ManifestVersionMismatch { found: String },
    ManifestEntryInvalid { detail: String },
    DigestMismatch { stored: String, recomputed: String },
    /// Bundle integrity check failed after loading.
    Verify(RunBundleError),
}

impl std::fmt::Display for RunDirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::ManifestParse { detail } => write!(f, "manifest parse error: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "manifest version mismatch: {found}")
            }
            Self::ManifestEntryInvalid { detail } => write!(f, "manifest entry invalid: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
            Self::Verify(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for RunDirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RunBundleError> for RunDirError {
    fn from(e: RunBundleError) -> Self {
        Self::Verify(e)
    }
}

/// Write `bundle` into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`RunDirError::Io`] on any filesystem failure.
pub fn write_run_dir(bundle: &RunBundle, dir: &Path) -> Result<(), RunDirError> {
    std::fs::create_dir_all(dir).map_err(|e| RunDirError::Io {
        detail: format!("create_dir_all: {e}"),
    })?;
    for artifact in bundle.artifacts.values() {
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }
    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;
    tracing::debug!(dir = %dir.display(), digest = %bundle.digest, "run directory written");
    Ok(())
}

/// Read and verify a run directory.
///
/// # Errors
///
/// Returns [`RunDirError`] on any validation failure.
pub fn read_run_dir(dir: &Path) -> Result<RunBundle, RunDirError> {
    let manifest_bytes = read_required(dir, MANIFEST_FILENAME)?;
    let digest_bytes = read_required(dir, DIGEST_FILENAME)?;

    let manifest: serde_json::Value =
        serde_json::from_slice(&manifest_bytes).map_err(|e| RunDirError::ManifestParse {
            detail: e.to_string(),
        })?;

    let schema_version = manifest["schema_version"].as_str().unwrap_or("");
    if schema_version != MANIFEST_SCHEMA {
        return Err(RunDirError::ManifestVersionMismatch {
            found: schema_version.to_string(),
        });
    }

    let entries = manifest["artifacts"]
        .as_array()
        .ok_or_else(|| RunDirError::ManifestParse {
            detail: "\"artifacts\" is not an array".into(),
        })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| RunDirError::ManifestEntryInvalid {
                detail: "missing \"name\" field".into(),
            })?
            .to_string();
        if name.contains(['/', '\\']) || METADATA_FILENAMES.contains(&name.as_str()) {
            return Err(RunDirError::ManifestEntryInvalid {
                detail: format!("illegal artifact name: {name}"),
            });
        }
        let hash_str = entry["content_hash"].as_str().ok_or_else(|| {
            RunDirError::ManifestEntryInvalid {
                detail: format!("missing \"content_hash\" for {name}"),
            }
        })?;
        let content_hash =
            ContentHash::parse(hash_str).ok_or_else(|| RunDirError::ManifestEntryInvalid {
                detail: format!("invalid content_hash for {name}: {hash_str}"),
            })?;
        let content = std::fs::read(dir.join(&name))
            .map_err(|_| RunDirError::MissingArtifact { name: name.clone() })?;

        artifacts.insert(
            name.clone(),
            RunArtifact {
                name,
                content,
                content_hash,
            },
        );
    }

    let allowed: BTreeSet<&str> = artifacts
        .keys()
        .map(String::as_str)
        .chain(METADATA_FILENAMES.iter().copied())
        .collect();
    for filename in list_files(dir)? {
        if !allowed.contains(filename.as_str()) {
            return Err(RunDirError::ExtraFile { name: filename });
        }
    }

    let recomputed = canonical_hash(HashDomain::RunDigest, &manifest_bytes);
    let stored = String::from_utf8_lossy(&digest_bytes).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(RunDirError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    let bundle = RunBundle {
        artifacts,
        manifest: manifest_bytes,
        digest: recomputed,
    };
    verify_run_bundle(&bundle)?;
    Ok(bundle)
}

/// Write via temp file + rename.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), RunDirError> {
    let dir = path.parent().ok_or_else(|| RunDirError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_path = dir.join(format!(
        "{TEMP_PREFIX}{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    std::fs::write(&temp_path, content).map_err(|e| RunDirError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| RunDirError::Io {
        detail: format!("rename {} → {}: {e}", temp_path.display(), path.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, RunDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| RunDirError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, skipping leftover temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, RunDirError> {
    let io = |e: std::io::Error| RunDirError::Io {
        detail: format!("read_dir: {e}"),
    };
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        if !entry.file_type().map_err(io)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TEMP_PREFIX) {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
