//! Error types for unified-diff handling.

use thiserror::Error;
use warden_types::ReasonCode;

/// Error types for parsing and applying unified diffs.
#[derive(Error, Debug, Clone)]
pub enum DiffError {
    /// Patch text is not well-formed unified diff.
    #[error("malformed patch: {0}")]
    Parse(String),

    /// A hunk's anchor context could not be located within the search
    /// window; the whole application fails, nothing is partially applied.
    #[error("hunk {hunk_index} does not match the current content")]
    Conflict {
        /// Zero-based index of the failing hunk, in application order.
        hunk_index: usize,
    },
}

impl DiffError {
    /// Map to the shared failure taxonomy.
    #[must_use]
    pub const fn reason_code(&self) -> ReasonCode {
        match self {
            Self::Parse(_) | Self::Conflict { .. } => ReasonCode::PatchConflict,
        }
    }
}
