//! warden-types - Common type definitions for the Warden mutation core
//!
//! This crate provides the shared vocabulary used across all Warden crates:
//! operation kinds with their resource ceilings, and the machine-readable
//! failure taxonomy that every user-visible error carries.
//!
//! Wire-facing types derive `serde` so transport adapters can serialize
//! gate decisions and mutation reports unchanged.

use serde::{Deserialize, Serialize};

/// Kind of filesystem operation being gated.
///
/// Every kind maps to a `(max_bytes, max_millis)` pair in a static limit
/// table. Kinds not recognized on the wire deserialize to [`Unknown`]
/// and fail closed to the most conservative ceilings.
///
/// [`Unknown`]: OperationKind::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Full-content read of a single file.
    Read,
    /// Creating or overwriting a single file.
    Write,
    /// In-place content mutation (literal/regex/diff edits).
    Edit,
    /// Per-file work inside a recursive directory walk.
    Scan,
    /// Bounded prefix read for classification/preview.
    Peek,
    /// Any kind this build does not recognize; fails closed.
    #[serde(other)]
    Unknown,
}

/// Resource ceilings for one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLimits {
    /// Maximum file size in bytes.
    pub max_bytes: u64,
    /// Maximum wall-clock time in milliseconds.
    pub max_millis: u64,
}

const MIB: u64 = 1024 * 1024;
const KIB: u64 = 1024;

/// The most conservative entry in the limit table.
///
/// Unknown operation kinds resolve here, so a transport that grows a new
/// kind before this crate learns about it cannot widen its own ceilings.
pub const CONSERVATIVE_LIMITS: OperationLimits = OperationLimits {
    max_bytes: 64 * KIB,
    max_millis: 5_000,
};

impl OperationKind {
    /// Look up the resource ceilings for this kind.
    ///
    /// The table is static and total: every kind has an entry, and
    /// [`OperationKind::Unknown`] resolves to [`CONSERVATIVE_LIMITS`].
    #[must_use]
    pub const fn limits(self) -> OperationLimits {
        match self {
            Self::Read | Self::Write => OperationLimits {
                max_bytes: 50 * MIB,
                max_millis: 30_000,
            },
            Self::Edit => OperationLimits {
                max_bytes: 10 * MIB,
                max_millis: 30_000,
            },
            Self::Scan => OperationLimits {
                max_bytes: 256 * KIB,
                max_millis: 5_000,
            },
            Self::Peek | Self::Unknown => CONSERVATIVE_LIMITS,
        }
    }

    /// Whether this kind reads file content (and therefore needs the
    /// binary-content check in the safety gate).
    #[must_use]
    pub const fn touches_content(self) -> bool {
        !matches!(self, Self::Write)
    }
}

/// Machine-readable failure taxonomy.
///
/// Every user-visible failure carries one of these codes plus a short list
/// of concrete next actions, never a bare exception string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Requested path resolves outside every allowed root.
    PathOutsideSandbox,
    /// Target does not exist.
    PathNotFound,
    /// Target exceeds the size ceiling for the operation kind.
    SizeExceeded,
    /// Target is binary content or a deny-listed executable type.
    BinaryOrExecutable,
    /// The OS denied access to the target.
    PermissionDenied,
    /// Operation exceeded its time budget.
    Timeout,
    /// Regex pattern is invalid or structurally dangerous.
    InvalidPattern,
    /// An edit matched nothing in the current content.
    NoMatch,
    /// A diff hunk's context could not be located in the current content.
    PatchConflict,
    /// Unclassified failure.
    Unknown,
}

impl ReasonCode {
    /// Wire string for this code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PathOutsideSandbox => "PATH_OUTSIDE_SANDBOX",
            Self::PathNotFound => "PATH_NOT_FOUND",
            Self::SizeExceeded => "SIZE_EXCEEDED",
            Self::BinaryOrExecutable => "BINARY_OR_EXECUTABLE",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Timeout => "TIMEOUT",
            Self::InvalidPattern => "INVALID_PATTERN",
            Self::NoMatch => "NO_MATCH",
            Self::PatchConflict => "PATCH_CONFLICT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Concrete next actions a caller can take to recover.
    #[must_use]
    pub const fn advice(self) -> &'static [&'static str] {
        match self {
            Self::PathOutsideSandbox => &[
                "use a path inside one of the configured sandbox roots",
                "check whether the path traverses a symlink that leaves the sandbox",
            ],
            Self::PathNotFound => &[
                "list the parent directory to confirm the file name",
                "create the file with a write operation first",
            ],
            Self::SizeExceeded => &[
                "operate on a smaller file or split the work",
                "use a peek operation to inspect a bounded prefix instead",
            ],
            Self::BinaryOrExecutable => &[
                "text mutation is only supported for text files",
                "verify the file extension and content are what you expect",
            ],
            Self::PermissionDenied => &[
                "check the file's ownership and mode bits",
                "retry against a path the process can access",
            ],
            Self::Timeout => &[
                "the result is unknown; re-read the file to verify its state",
                "retry with a smaller input or simpler pattern",
            ],
            Self::InvalidPattern => &[
                "simplify the pattern; nested quantifiers are rejected",
                "use a literal edit if no pattern features are needed",
            ],
            Self::NoMatch => &[
                "re-read the file to get current content before retrying",
                "check the old text for exact whitespace and line endings",
            ],
            Self::PatchConflict => &[
                "the file changed since the diff was generated; re-read and regenerate it",
                "apply smaller hunks so unrelated drift cannot invalidate them",
            ],
            Self::Unknown => &["re-read the file and retry the operation"],
        }
    }
}
