//! The set of directories a request may touch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SandboxError;

/// Immutable set of canonical absolute directory paths established once at
/// process start.
///
/// Every accepted request path must have one member as a proper prefix after
/// canonicalization. The set is read-only after construction, so it can be
/// shared freely across concurrent requests.
#[derive(Debug, Clone)]
pub struct AllowedRootSet {
    roots: Vec<PathBuf>,
}

impl AllowedRootSet {
    /// Build the root set, canonicalizing each configured root.
    ///
    /// Roots must exist and be directories at construction time; symlinked
    /// roots are resolved to their real targets so later containment checks
    /// compare canonical forms on both sides.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError` when no roots are given, a root cannot be
    /// canonicalized, or a root is not a directory.
    pub fn new<I, P>(configured: I) -> Result<Self, SandboxError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut roots = Vec::new();
        for root in configured {
            let root = root.as_ref();
            let canonical = fs::canonicalize(root).map_err(|source| {
                SandboxError::UnresolvableRoot {
                    path: root.to_path_buf(),
                    source,
                }
            })?;
            if !canonical.is_dir() {
                return Err(SandboxError::NotADirectory(root.to_path_buf()));
            }
            roots.push(canonical);
        }
        if roots.is_empty() {
            return Err(SandboxError::EmptyRootSet);
        }
        Ok(Self { roots })
    }

    /// Whether a canonical path is equal to, or a descendant of, some member.
    ///
    /// `Path::starts_with` compares whole components, so `/sandbox-evil`
    /// never matches a `/sandbox` root.
    #[must_use]
    pub fn contains(&self, canonical: &Path) -> bool {
        self.roots.iter().any(|root| canonical.starts_with(root))
    }

    /// The canonical roots, for diagnostics.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}
