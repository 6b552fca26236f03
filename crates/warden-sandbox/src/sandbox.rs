//! Path validation against the allowed root set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::roots::AllowedRootSet;

/// Rejection reasons carried in [`PathValidation::reason`].
///
/// These are wire-stable strings; callers branch on them to decide how to
/// retry (for example, resubmitting a relative path as absolute).
pub mod reason {
    /// The requested path was empty.
    pub const EMPTY_PATH: &str = "empty_path";
    /// The deployment requires absolute paths and the request was relative.
    pub const RELATIVE_PATH: &str = "relative_path";
    /// The canonical path is outside every allowed root.
    pub const OUTSIDE_ALLOWED_ROOTS: &str = "outside_allowed_roots";
    /// A `..` segment sits below the deepest existing ancestor and cannot
    /// be resolved against the filesystem.
    pub const UNRESOLVABLE_PARENT_SEGMENT: &str = "unresolvable_parent_segment";
    /// Canonicalization failed (for example, a dangling symlink segment).
    pub const UNRESOLVABLE_PATH: &str = "unresolvable_path";
}

/// Verdict for one requested path.
///
/// Produced fresh per request and never cached: symlinks and mounts can
/// change between calls, and a cached verdict would reintroduce the very
/// TOCTOU gap the sandbox exists to close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathValidation {
    /// Whether the path may be touched.
    pub allowed: bool,
    /// Canonical absolute path when allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<PathBuf>,
    /// Rejection reason when not allowed (see [`reason`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PathValidation {
    fn allow(resolved: PathBuf) -> Self {
        Self {
            allowed: true,
            resolved_path: Some(resolved),
            reason: None,
        }
    }

    fn reject(reason: &str) -> Self {
        Self {
            allowed: false,
            resolved_path: None,
            reason: Some(reason.to_string()),
        }
    }
}

/// Configuration for [`PathSandbox`].
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxConfig {
    /// Reject relative request paths outright (default: true).
    ///
    /// When disabled, relative paths are resolved against the process
    /// working directory before validation.
    #[serde(default = "default_require_absolute")]
    pub require_absolute: bool,
}

const fn default_require_absolute() -> bool {
    true
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            require_absolute: true,
        }
    }
}

/// Decides whether a requested path may be touched at all.
///
/// Canonicalization uses the filesystem's real-path resolution, never string
/// manipulation alone: a symlink whose string form looks contained can still
/// point outside the roots, and only `fs::canonicalize` sees that.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    roots: AllowedRootSet,
    config: SandboxConfig,
}

impl PathSandbox {
    /// Create a sandbox over the given root set with default configuration.
    #[must_use]
    pub fn new(roots: AllowedRootSet) -> Self {
        Self::with_config(roots, SandboxConfig::default())
    }

    /// Create with custom configuration.
    #[must_use]
    pub const fn with_config(roots: AllowedRootSet, config: SandboxConfig) -> Self {
        Self { roots, config }
    }

    /// The root set this sandbox enforces.
    #[must_use]
    pub const fn roots(&self) -> &AllowedRootSet {
        &self.roots
    }

    /// Validate one requested path.
    ///
    /// Accepts iff the canonical path is equal to, or a descendant of, some
    /// allowed root. The target may not exist yet: the deepest existing
    /// ancestor is canonicalized and the remaining segments re-appended
    /// verbatim, so a file about to be created still validates, unless the
    /// non-existent tail contains `..`, which cannot be resolved safely.
    ///
    /// Every call re-touches the filesystem. This is intentional; the
    /// defense is pointless if stale.
    #[must_use]
    pub fn validate(&self, requested: &Path) -> PathValidation {
        if requested.as_os_str().is_empty() {
            return PathValidation::reject(reason::EMPTY_PATH);
        }

        let requested = if requested.is_absolute() {
            requested.to_path_buf()
        } else if self.config.require_absolute {
            return PathValidation::reject(reason::RELATIVE_PATH);
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(requested),
                Err(_) => return PathValidation::reject(reason::UNRESOLVABLE_PATH),
            }
        };

        let resolved = match resolve_real_path(&requested) {
            Ok(resolved) => resolved,
            Err(rejection) => {
                warn!(path = %requested.display(), reason = rejection, "sandbox rejected path");
                return PathValidation::reject(rejection);
            }
        };

        if self.roots.contains(&resolved) {
            PathValidation::allow(resolved)
        } else {
            warn!(
                path = %requested.display(),
                resolved = %resolved.display(),
                "path resolves outside allowed roots"
            );
            PathValidation::reject(reason::OUTSIDE_ALLOWED_ROOTS)
        }
    }
}

/// Canonicalize `requested`, tolerating a non-existent target.
///
/// Walks up to the deepest existing ancestor, canonicalizes it (resolving
/// `.`/`..` and following symlinks), then re-appends the popped segments.
/// Existing intermediate symlinks are resolved by the canonicalization, so
/// one pointing outside the sandbox surfaces in the returned path and fails
/// the containment check.
fn resolve_real_path(requested: &Path) -> Result<PathBuf, &'static str> {
    let mut existing = requested.to_path_buf();
    let mut tail: Vec<std::ffi::OsString> = Vec::new();

    while fs::symlink_metadata(&existing).is_err() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_owned());
                existing = parent.to_path_buf();
            }
            // `file_name()` is None for paths ending in `..`; a parent
            // segment below a non-existent directory has no real target
            // to resolve against.
            (Some(_), None) => return Err(reason::UNRESOLVABLE_PARENT_SEGMENT),
            (None, _) => return Err(reason::UNRESOLVABLE_PATH),
        }
    }

    let mut resolved = fs::canonicalize(&existing).map_err(|_| reason::UNRESOLVABLE_PATH)?;
    for segment in tail.iter().rev() {
        resolved.push(segment);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sandbox_over(dir: &TempDir) -> PathSandbox {
        PathSandbox::new(AllowedRootSet::new([dir.path()]).unwrap())
    }

    #[test]
    fn test_empty_path_rejected() {
        let dir = TempDir::new().unwrap();
        let verdict = sandbox_over(&dir).validate(Path::new(""));
        assert!(!verdict.allowed);
        assert_eq!(verdict.reason.as_deref(), Some(reason::EMPTY_PATH));
    }

    #[test]
    fn test_relative_path_rejected_with_distinct_reason() {
        let dir = TempDir::new().unwrap();
        let verdict = sandbox_over(&dir).validate(Path::new("a.txt"));
        assert!(!verdict.allowed);
        assert_eq!(verdict.reason.as_deref(), Some(reason::RELATIVE_PATH));
    }

    #[test]
    fn test_existing_file_inside_root_allowed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let verdict = sandbox_over(&dir).validate(&file);
        assert!(verdict.allowed);
        let resolved = verdict.resolved_path.unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize(&file).unwrap());
    }

    #[test]
    fn test_nonexistent_file_inside_root_allowed() {
        let dir = TempDir::new().unwrap();
        let verdict = sandbox_over(&dir).validate(&dir.path().join("new/deeper/b.txt"));
        assert!(verdict.allowed);
    }

    #[test]
    fn test_path_outside_roots_rejected() {
        let dir = TempDir::new().unwrap();
        let verdict = sandbox_over(&dir).validate(Path::new("/etc/passwd"));
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reason.as_deref(),
            Some(reason::OUTSIDE_ALLOWED_ROOTS)
        );
    }

    #[test]
    fn test_dot_dot_escape_rejected() {
        let dir = TempDir::new().unwrap();
        let escape = dir.path().join("..").join("..").join("etc").join("passwd");
        let verdict = sandbox_over(&dir).validate(&escape);
        assert!(!verdict.allowed);
    }

    #[test]
    fn test_dot_dot_below_nonexistent_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let tricky = dir.path().join("missing/../a.txt");
        let verdict = sandbox_over(&dir).validate(&tricky);
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reason.as_deref(),
            Some(reason::UNRESOLVABLE_PARENT_SEGMENT)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outside = TempDir::new().unwrap();
        let inside = TempDir::new().unwrap();
        let link = inside.path().join("innocent");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();

        let verdict = sandbox_over(&inside).validate(&link.join("secret.txt"));
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reason.as_deref(),
            Some(reason::OUTSIDE_ALLOWED_ROOTS)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_within_root_allowed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("real");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let verdict = sandbox_over(&dir).validate(&link.join("c.txt"));
        assert!(verdict.allowed);
        // Resolved form points at the real directory, not the alias.
        let resolved = verdict.resolved_path.unwrap();
        assert!(resolved.ends_with("real/c.txt"));
    }

    #[test]
    fn test_relative_path_allowed_when_configured() {
        let dir = TempDir::new().unwrap();
        let config = SandboxConfig {
            require_absolute: false,
        };
        let sandbox =
            PathSandbox::with_config(AllowedRootSet::new([dir.path()]).unwrap(), config);

        // Resolves against the working directory, which is outside the root.
        let verdict = sandbox.validate(Path::new("some-file.txt"));
        assert_ne!(verdict.reason.as_deref(), Some(reason::RELATIVE_PATH));
    }
}
