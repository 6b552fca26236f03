//! Error types for bounded regex execution.

use thiserror::Error;

/// Error types for pattern validation and compilation.
///
/// Each variant maps to the `INVALID_PATTERN` reason code at the engine
/// boundary; the message carries the specific cause.
#[derive(Error, Debug, Clone)]
pub enum RegexError {
    /// Pattern failed the structural ReDoS screen.
    #[error("pattern rejected: {reason}")]
    DangerousPattern {
        /// Why the pattern was rejected before compilation.
        reason: &'static str,
    },

    /// Pattern is not valid regex syntax (or exceeds the compiled size cap).
    #[error("pattern failed to compile: {0}")]
    Compile(String),

    /// A flag character outside the supported `gimsxu` set.
    #[error("unsupported regex flag: {0:?}")]
    UnknownFlag(char),
}
