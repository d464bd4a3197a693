//! Search policy types.

use pathtrace_kernel::proof::canon::{canonical_json_bytes, CanonError};
use pathtrace_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::SearchError;

/// Default pop budget per run.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Per-run budget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on frontier pops (stale pops included).
    pub max_steps: u64,
}

impl SearchPolicy {
    /// Validate that the policy can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicy`] if `max_steps` is zero, which
    /// would stop every run before the start cell is settled.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_steps == 0 {
            return Err(SearchError::UnsupportedPolicy {
                detail: "max_steps must be at least 1".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({ "max_steps": self.max_steps })
    }

    /// Parse a policy from JSON bytes. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for invalid JSON or a mistyped field.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, PolicyError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| PolicyError::Parse {
                detail: e.to_string(),
            })?;
        let mut policy = Self::default();
        match &value["max_steps"] {
            serde_json::Value::Null => {}
            v => {
                policy.max_steps = v.as_u64().ok_or(PolicyError::InvalidField {
                    field: "max_steps",
                })?;
            }
        }
        Ok(policy)
    }

    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical policy JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(
            HashDomain::SearchPolicy,
            &self.to_canonical_json_bytes()?,
        ))
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Failure parsing a policy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    Parse { detail: String },
    InvalidField { field: &'static str },
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { detail } => write!(f, "policy JSON parse error: {detail}"),
            Self::InvalidField { field } => write!(f, "policy field {field} has the wrong type"),
        }
    }
}

impl std::error::Error for PolicyError {}
