//! Error types for sandbox construction.

use std::path::PathBuf;

use thiserror::Error;

/// Error types for building an [`AllowedRootSet`].
///
/// Validation of individual request paths never errors; it returns a
/// [`PathValidation`] verdict instead. These variants only cover
/// misconfiguration at process start.
///
/// [`AllowedRootSet`]: crate::AllowedRootSet
/// [`PathValidation`]: crate::PathValidation
#[derive(Error, Debug)]
pub enum SandboxError {
    /// No roots were configured; an empty sandbox would allow nothing.
    #[error("no sandbox roots configured")]
    EmptyRootSet,

    /// A configured root could not be canonicalized.
    #[error("sandbox root {path} is not resolvable: {source}")]
    UnresolvableRoot {
        /// The root as configured.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// A configured root resolves to something other than a directory.
    #[error("sandbox root {0} is not a directory")]
    NotADirectory(PathBuf),
}
