//! Error types for the mutation pipeline.

use std::path::PathBuf;

use thiserror::Error;

use warden_gate::GateError;
use warden_sandbox::SandboxError;
use warden_types::ReasonCode;

/// Terminal failures of a mutation request.
///
/// These cover the gates in front of the engine; once edits start, individual
/// failures are reported per edit inside the [`crate::MutationReport`] and
/// never surface here.
#[derive(Error, Debug)]
pub enum MutateError {
    /// The requested path was rejected by the sandbox; no filesystem read
    /// was attempted.
    #[error("path {path} rejected by sandbox: {reason}")]
    SandboxRejected {
        /// Path as requested by the caller.
        path: PathBuf,
        /// Wire-stable rejection reason (see `warden_sandbox::reason`).
        reason: String,
    },

    /// The safety gate rejected the operation against the resolved path.
    #[error("operation rejected: {message}")]
    GateRejected {
        /// Failure taxonomy code from the gate verdict.
        reason: ReasonCode,
        /// Human-readable explanation.
        message: String,
    },

    /// The allowed root set could not be constructed.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// Bounded read of the target failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Writing the mutated content back failed; the file is in an unknown
    /// state and the caller must re-read to verify.
    #[error("failed to persist {path}: {source}")]
    Persist {
        /// Resolved path of the write target.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

impl MutateError {
    /// Map to the shared failure taxonomy.
    #[must_use]
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::SandboxRejected { .. } => ReasonCode::PathOutsideSandbox,
            Self::GateRejected { reason, .. } => *reason,
            Self::Sandbox(_) => ReasonCode::PathNotFound,
            Self::Gate(e) => e.reason_code(),
            Self::Persist { .. } => ReasonCode::Unknown,
        }
    }

    /// Concrete next actions for this failure.
    #[must_use]
    pub fn advice(&self) -> &'static [&'static str] {
        self.reason_code().advice()
    }
}
