//! Error types for gated file I/O.

use thiserror::Error;
use warden_types::ReasonCode;

/// Error types for bounded reads and timeout enforcement.
///
/// Gate *decisions* are not errors; [`SafetyGate::check`] returns a
/// [`SafetyResult`] verdict. These variants cover the I/O helpers around it.
///
/// [`SafetyGate::check`]: crate::SafetyGate::check
/// [`SafetyResult`]: crate::SafetyResult
#[derive(Error, Debug)]
pub enum GateError {
    /// File does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// File exceeds the size ceiling.
    #[error("file too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NUL bytes detected).
    #[error("binary file detected")]
    BinaryFile,

    /// File content is not valid UTF-8 and the caller required a strict
    /// decode.
    #[error("file content is not valid UTF-8")]
    InvalidEncoding,

    /// Operation exceeded its time budget.
    #[error("operation '{label}' timed out after {millis}ms")]
    Timeout {
        /// What was being awaited.
        label: String,
        /// The budget that expired.
        millis: u64,
    },

    /// Low-level I/O error from std::io.
    #[error("io error: {0}")]
    System(#[from] std::io::Error),
}

impl GateError {
    /// Map to the shared failure taxonomy.
    #[must_use]
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::NotFound(_) => ReasonCode::PathNotFound,
            Self::TooLarge(..) => ReasonCode::SizeExceeded,
            Self::BinaryFile | Self::InvalidEncoding => ReasonCode::BinaryOrExecutable,
            Self::Timeout { .. } => ReasonCode::Timeout,
            Self::System(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ReasonCode::PermissionDenied
            }
            Self::System(_) => ReasonCode::Unknown,
        }
    }
}
