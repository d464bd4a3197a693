//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime terminations
//! (goal reached, frontier exhausted, step limit) are expressed via
//! [`crate::frame::TerminationReason`] and always come with a trace.

use pathtrace_kernel::grid::GridError;

/// Typed failure for pre-flight search validation.
///
/// Returned before any frame is recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The grid's endpoints are missing, out of bounds, equal, or walled.
    Grid(GridError),
    /// The search policy cannot be honored.
    UnsupportedPolicy { detail: String },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
            Self::UnsupportedPolicy { detail } => write!(f, "unsupported search policy: {detail}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::UnsupportedPolicy { .. } => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Random-access failure on a recorded trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// `index` is not in `[0, len)`.
    OutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "frame index {index} out of range for trace of {len} frames")
            }
        }
    }
}

impl std::error::Error for TraceError {}
