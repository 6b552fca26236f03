//! Per-operation safety decisions.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use warden_types::{OperationKind, ReasonCode};

use crate::cache::ClassifierCache;
use crate::classify::{Classify, PrefixClassifier, SNIFF_PREFIX_LEN};
use crate::io::read_prefix;

/// Extensions rejected unconditionally, regardless of content sniffing.
///
/// Content sniffing can be fooled; extension policy cannot. The two checks
/// are layered, not alternatives.
pub const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "com", "msi", "scr", "cpl", "drv", "sys", "o", "a",
];

/// Actual-vs-limit figures attached to a size rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDetails {
    /// Observed value.
    pub actual: u64,
    /// The ceiling that was exceeded.
    pub limit: u64,
}

/// Verdict for one `(path, operation)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyResult {
    /// Whether the operation may proceed.
    pub safe: bool,
    /// Failure taxonomy code when not safe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    /// Human-readable explanation when not safe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Diagnostics for size rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<SizeDetails>,
}

impl SafetyResult {
    fn pass() -> Self {
        Self {
            safe: true,
            reason: None,
            message: None,
            details: None,
        }
    }

    fn reject(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            safe: false,
            reason: Some(reason),
            message: Some(message.into()),
            details: None,
        }
    }

    fn reject_size(message: impl Into<String>, actual: u64, limit: u64) -> Self {
        Self {
            safe: false,
            reason: Some(ReasonCode::SizeExceeded),
            message: Some(message.into()),
            details: Some(SizeDetails { actual, limit }),
        }
    }
}

/// Ceilings for multi-file operations (recursive delete, scan).
///
/// A second-order gate: each file still has its own per-operation limit,
/// but the batch as a whole must also stay under these.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchLimits {
    /// Maximum number of files in one batch.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum combined size of one batch, in bytes.
    #[serde(default = "default_max_total_bytes")]
    pub max_total_bytes: u64,
}

const fn default_max_files() -> usize {
    1_000
}

const fn default_max_total_bytes() -> u64 {
    100 * 1024 * 1024
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_total_bytes: default_max_total_bytes(),
        }
    }
}

/// Bounds the size, time, and content type of any operation against a path
/// that already passed the sandbox.
pub struct SafetyGate {
    classifier: Box<dyn Classify>,
    cache: ClassifierCache,
    batch: BatchLimits,
}

impl SafetyGate {
    /// Create a gate with the default prefix classifier and batch limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(Box::new(PrefixClassifier))
    }

    /// Create with a custom classifier implementation.
    #[must_use]
    pub fn with_classifier(classifier: Box<dyn Classify>) -> Self {
        Self {
            classifier,
            cache: ClassifierCache::default(),
            batch: BatchLimits::default(),
        }
    }

    /// Override the batch ceilings.
    #[must_use]
    pub fn with_batch_limits(mut self, batch: BatchLimits) -> Self {
        self.batch = batch;
        self
    }

    /// The classification cache, so writers can invalidate entries.
    #[must_use]
    pub const fn cache(&self) -> &ClassifierCache {
        &self.cache
    }

    /// Decide whether `kind` may proceed against `path`.
    ///
    /// Checks, in order: the executable extension deny-list, the size
    /// ceiling for the operation kind, and (for content-touching kinds) a
    /// bounded-prefix binary classification. A missing target is only
    /// acceptable for writes, which create it.
    pub async fn check(&self, path: &Path, kind: OperationKind) -> SafetyResult {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if EXECUTABLE_EXTENSIONS
                .iter()
                .any(|deny| ext.eq_ignore_ascii_case(deny))
            {
                warn!(path = %path.display(), ext, "deny-listed executable extension");
                return SafetyResult::reject(
                    ReasonCode::BinaryOrExecutable,
                    format!("extension .{ext} is deny-listed for mutation"),
                );
            }
        }

        let limits = kind.limits();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if kind == OperationKind::Write {
                    // Writes create their target; nothing to stat yet.
                    return SafetyResult::pass();
                }
                return SafetyResult::reject(
                    ReasonCode::PathNotFound,
                    format!("{} does not exist", path.display()),
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return SafetyResult::reject(
                    ReasonCode::PermissionDenied,
                    format!("access to {} denied", path.display()),
                );
            }
            Err(e) => {
                return SafetyResult::reject(ReasonCode::Unknown, e.to_string());
            }
        };

        if metadata.len() > limits.max_bytes {
            debug!(
                path = %path.display(),
                actual = metadata.len(),
                limit = limits.max_bytes,
                "size ceiling exceeded"
            );
            return SafetyResult::reject_size(
                format!("{} exceeds the {:?} size ceiling", path.display(), kind),
                metadata.len(),
                limits.max_bytes,
            );
        }

        if kind.touches_content() && metadata.is_file() && metadata.len() > 0 {
            let prefix = match read_prefix(path, SNIFF_PREFIX_LEN).await {
                Ok(prefix) => prefix,
                Err(e) => return SafetyResult::reject(e.reason_code(), e.to_string()),
            };
            let classification = self
                .cache
                .get_or_classify(self.classifier.as_ref(), path, &prefix);
            if !classification.readable {
                debug!(path = %path.display(), "binary content rejected for text mutation");
                return SafetyResult::reject(
                    ReasonCode::BinaryOrExecutable,
                    format!("{} is binary content", path.display()),
                );
            }
        }

        SafetyResult::pass()
    }

    /// Gate a multi-file operation by its aggregate dimensions.
    ///
    /// Independent of any single file's own limit: either dimension over
    /// its ceiling fails the whole batch.
    #[must_use]
    pub fn validate_batch(&self, file_count: usize, total_bytes: u64) -> SafetyResult {
        if file_count > self.batch.max_files {
            return SafetyResult::reject_size(
                "batch file count exceeds ceiling",
                file_count as u64,
                self.batch.max_files as u64,
            );
        }
        if total_bytes > self.batch.max_total_bytes {
            return SafetyResult::reject_size(
                "batch total size exceeds ceiling",
                total_bytes,
                self.batch.max_total_bytes,
            );
        }
        SafetyResult::pass()
    }
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_text_file_passes_edit() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("a.txt");
        std::fs::write(&p, "plain text\n").unwrap();

        let verdict = SafetyGate::new().check(&p, OperationKind::Edit).await;
        assert!(verdict.safe, "unexpected rejection: {verdict:?}");
    }

    #[tokio::test]
    async fn test_size_ceiling_carries_details() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("big.txt");
        // Peek ceiling is 64 KiB; 100 KiB of text exceeds it.
        std::fs::write(&p, "x".repeat(100 * 1024)).unwrap();

        let verdict = SafetyGate::new().check(&p, OperationKind::Peek).await;
        assert!(!verdict.safe);
        assert_eq!(verdict.reason, Some(ReasonCode::SizeExceeded));
        let details = verdict.details.unwrap();
        assert_eq!(details.actual, 100 * 1024);
        assert_eq!(details.limit, 64 * 1024);
    }

    #[tokio::test]
    async fn test_binary_file_rejected_for_edit() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("blob.dat");
        std::fs::write(&p, b"\x00\x01\x02\x03").unwrap();

        let verdict = SafetyGate::new().check(&p, OperationKind::Edit).await;
        assert!(!verdict.safe);
        assert_eq!(verdict.reason, Some(ReasonCode::BinaryOrExecutable));
    }

    #[tokio::test]
    async fn test_executable_extension_rejected_without_sniffing() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("innocent.exe");
        // Perfectly ordinary text content; the extension alone decides.
        std::fs::write(&p, "echo hello\n").unwrap();

        let verdict = SafetyGate::new().check(&p, OperationKind::Read).await;
        assert!(!verdict.safe);
        assert_eq!(verdict.reason, Some(ReasonCode::BinaryOrExecutable));
    }

    #[tokio::test]
    async fn test_missing_target_ok_for_write_only() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("new.txt");
        let gate = SafetyGate::new();

        assert!(gate.check(&p, OperationKind::Write).await.safe);

        let read = gate.check(&p, OperationKind::Read).await;
        assert!(!read.safe);
        assert_eq!(read.reason, Some(ReasonCode::PathNotFound));
    }

    #[test]
    fn test_batch_ceilings() {
        let gate = SafetyGate::new();
        assert!(gate.validate_batch(10, 1024).safe);

        let too_many = gate.validate_batch(10_000, 1024);
        assert!(!too_many.safe);
        assert_eq!(too_many.reason, Some(ReasonCode::SizeExceeded));

        let too_big = gate.validate_batch(10, 500 * 1024 * 1024);
        assert!(!too_big.safe);
    }
}
