//! File mutation pipeline: sandbox, gate, read, engine, persist.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use warden_gate::{SafetyGate, enforce_timeout, read_text_strict};
use warden_sandbox::{AllowedRootSet, PathSandbox, SandboxConfig};
use warden_types::{OperationKind, ReasonCode};

use crate::engine::MutationEngine;
use crate::error::MutateError;
use crate::types::{EditOperation, MutationOptions, MutationReport};

/// Configuration for a [`Mutator`].
#[derive(Debug, Clone, Deserialize)]
pub struct MutatorConfig {
    /// Directories the mutator may touch.
    pub roots: Vec<PathBuf>,
    /// Reject relative request paths (default: true).
    #[serde(default = "default_require_absolute")]
    pub require_absolute: bool,
    /// Engine options.
    #[serde(default)]
    pub options: MutationOptions,
}

const fn default_require_absolute() -> bool {
    true
}

/// Mutates files behind the sandbox and safety gate.
///
/// Every request runs the same path: validate, gate, bounded read, apply,
/// then either return the report (dry run) or persist and return it. Dry
/// run and real run differ only in the final write, so a preview can never
/// diverge from what a real run would do.
pub struct Mutator {
    sandbox: PathSandbox,
    gate: SafetyGate,
    engine: MutationEngine,
}

impl Mutator {
    /// Build a mutator from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MutateError::Sandbox` when the root set cannot be
    /// constructed (empty, missing, or non-directory roots).
    pub fn new(config: MutatorConfig) -> Result<Self, MutateError> {
        let roots = AllowedRootSet::new(config.roots)?;
        let sandbox = PathSandbox::with_config(
            roots,
            SandboxConfig {
                require_absolute: config.require_absolute,
            },
        );
        Ok(Self {
            sandbox,
            gate: SafetyGate::new(),
            engine: MutationEngine::with_options(config.options),
        })
    }

    /// The sandbox, for callers that validate additional paths themselves.
    #[must_use]
    pub const fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    /// The safety gate, for callers gating non-mutating operations.
    #[must_use]
    pub const fn gate(&self) -> &SafetyGate {
        &self.gate
    }

    /// Apply edits to one file.
    ///
    /// Sandbox and gate failures are terminal: no read is attempted against
    /// a rejected path, no edit against a rejected file. Individual edit
    /// failures are reported inside the returned [`MutationReport`] instead.
    ///
    /// With `dry_run` the report is returned without touching the file;
    /// otherwise changed content is written back and the gate's classifier
    /// cache entry for the path is invalidated.
    ///
    /// # Errors
    ///
    /// Returns `MutateError::SandboxRejected`, `MutateError::GateRejected`,
    /// `MutateError::Gate` for a failed read, or `MutateError::Persist` for
    /// a failed write-back.
    pub async fn mutate_file(
        &self,
        path: &Path,
        edits: &[EditOperation],
        dry_run: bool,
    ) -> Result<MutationReport, MutateError> {
        let verdict = self.sandbox.validate(path);
        let Some(resolved) = verdict.resolved_path else {
            return Err(MutateError::SandboxRejected {
                path: path.to_path_buf(),
                reason: verdict.reason.unwrap_or_default(),
            });
        };

        let check = self.gate.check(&resolved, OperationKind::Edit).await;
        if !check.safe {
            return Err(MutateError::GateRejected {
                reason: check.reason.unwrap_or(ReasonCode::Unknown),
                message: check.message.unwrap_or_default(),
            });
        }

        let limits = OperationKind::Edit.limits();
        // Strict decode: content read here gets written back, and a lossy
        // substitution would corrupt bytes on lines no edit touched.
        let content = enforce_timeout(
            read_text_strict(&resolved, limits.max_bytes),
            limits.max_millis,
            "read for edit",
        )
        .await??;

        let report = self.engine.apply(&content, edits);
        debug!(
            path = %resolved.display(),
            edits = edits.len(),
            status = ?report.aggregate_status(),
            changed = report.changed(),
            dry_run,
            "mutation applied"
        );

        if !dry_run && report.changed() {
            let written = enforce_timeout(
                tokio::fs::write(&resolved, &report.final_content),
                limits.max_millis,
                "persist mutated content",
            )
            .await;
            // An attempted write leaves the content in unknown state even
            // when it fails or times out; a cached verdict may be stale.
            self.gate.cache().invalidate(&resolved);
            written?.map_err(|source| MutateError::Persist {
                path: resolved.clone(),
                source,
            })?;
            info!(path = %resolved.display(), "file mutated");
        }

        Ok(report)
    }
}
