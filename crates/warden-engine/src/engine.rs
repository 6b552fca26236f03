//! Pure edit application.
//!
//! The engine never touches disk: it maps `(content, edits)` to a
//! [`MutationReport`] and leaves persistence to the caller, so dry-run and
//! real-run share one code path.

use std::time::Duration;

use tracing::debug;

use warden_regex::{BoundedRegex, MatchSpan};
use warden_types::ReasonCode;

use crate::formatting;
use crate::types::{
    EditOperation, EditOutcome, EditStatus, MutationOptions, MutationReport,
};

/// Cap on sample lines attached to a `multiple_matches` outcome.
const MAX_SAMPLES: usize = 3;

/// Result of one edit against the accumulated content.
struct EditResult {
    status: EditStatus,
    match_count: usize,
    samples: Vec<String>,
    reason: Option<ReasonCode>,
    /// New content when the edit changed anything.
    content: Option<String>,
}

impl EditResult {
    fn unchanged(status: EditStatus) -> Self {
        Self {
            status,
            match_count: 0,
            samples: Vec::new(),
            reason: None,
            content: None,
        }
    }

    fn failed(reason: ReasonCode, description: impl Into<String>) -> Self {
        Self {
            status: EditStatus::Failed,
            match_count: 0,
            samples: vec![description.into()],
            reason: Some(reason),
            content: None,
        }
    }
}

/// Applies an ordered list of edits to text content.
#[derive(Debug, Clone, Default)]
pub struct MutationEngine {
    options: MutationOptions,
}

impl MutationEngine {
    /// Create an engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit options.
    #[must_use]
    pub const fn with_options(options: MutationOptions) -> Self {
        Self { options }
    }

    /// Apply `edits` strictly in input order against the accumulated
    /// content: edit N sees the output of edit N-1, not the original.
    ///
    /// Every edit produces an outcome; a failed edit does not abort the
    /// ones after it. Formatting conventions are detected from the original
    /// once, up front, and (under `preserve_formatting`) freshly introduced
    /// lines are normalized to them at the end. The report always carries a
    /// unified diff of the net change, empty when nothing changed.
    #[must_use]
    pub fn apply(&self, content: &str, edits: &[EditOperation]) -> MutationReport {
        let detected = formatting::detect(content);
        let mut current = content.to_string();
        let mut outcomes = Vec::with_capacity(edits.len());

        for (index, edit) in edits.iter().enumerate() {
            let result = match edit {
                EditOperation::Literal { old, new } => apply_literal(&current, old, new),
                EditOperation::Regex {
                    pattern,
                    replacement,
                    flags,
                } => self.apply_regex(&current, pattern, replacement, flags),
                EditOperation::DiffPatch { patch } => self.apply_patch(&current, patch),
            };

            debug!(
                index,
                kind = ?edit.kind(),
                status = ?result.status,
                match_count = result.match_count,
                "edit applied"
            );

            if let Some(next) = result.content {
                current = next;
            }
            outcomes.push(EditOutcome {
                index,
                kind: edit.kind(),
                status: result.status,
                match_count: result.match_count,
                samples: result.samples,
                reason: result.reason,
            });
        }

        let final_content = if self.options.preserve_formatting {
            formatting::normalize(content, &current, detected)
        } else {
            current
        };
        let diff = warden_diff::generate(content, &final_content);

        MutationReport {
            outcomes,
            final_content,
            diff,
            formatting: detected,
        }
    }

    fn apply_regex(
        &self,
        content: &str,
        pattern: &str,
        replacement: &str,
        flags: &str,
    ) -> EditResult {
        let regex = match BoundedRegex::compile(pattern, flags) {
            Ok(regex) => regex,
            // A rejected pattern never reaches execution.
            Err(e) => return EditResult::failed(ReasonCode::InvalidPattern, e.to_string()),
        };

        let budget = Duration::from_millis(self.options.regex_timeout_millis);
        let outcome = regex.execute(content, budget);
        if outcome.timed_out {
            return EditResult::failed(
                ReasonCode::Timeout,
                "pattern evaluation exceeded its time budget; no replacement was applied",
            );
        }

        let match_count = outcome.matches.len();
        if match_count == 0 {
            return EditResult::unchanged(EditStatus::NoMatch);
        }

        let status = if match_count > 1 {
            EditStatus::MultipleMatches
        } else {
            EditStatus::Success
        };
        let samples = if match_count > 1 {
            lines_for_spans(content, &outcome.matches, MAX_SAMPLES)
        } else {
            Vec::new()
        };

        EditResult {
            status,
            match_count,
            samples,
            reason: None,
            content: Some(regex.rewrite(content, replacement)),
        }
    }

    fn apply_patch(&self, content: &str, patch: &str) -> EditResult {
        let hunks = match warden_diff::parse(patch) {
            Ok(hunks) => hunks,
            Err(e) => return EditResult::failed(e.reason_code(), e.to_string()),
        };

        match warden_diff::apply(content, &hunks, self.options.fuzz_window) {
            Ok(next) => EditResult {
                status: EditStatus::Success,
                match_count: hunks.len(),
                samples: Vec::new(),
                reason: None,
                content: Some(next),
            },
            // All-or-nothing: the content is untouched by this edit.
            Err(e) => EditResult::failed(e.reason_code(), e.to_string()),
        }
    }
}

fn apply_literal(content: &str, old: &str, new: &str) -> EditResult {
    if old.is_empty() {
        // An empty needle matches everywhere; treat it as matching nothing.
        return EditResult::unchanged(EditStatus::NoMatch);
    }

    let match_count = content.matches(old).count();
    if match_count == 0 {
        return EditResult::unchanged(EditStatus::NoMatch);
    }

    let status = if match_count > 1 {
        EditStatus::MultipleMatches
    } else {
        EditStatus::Success
    };
    let samples = if match_count > 1 {
        content
            .lines()
            .filter(|line| line.contains(old))
            .take(MAX_SAMPLES)
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    EditResult {
        status,
        match_count,
        samples,
        reason: None,
        content: Some(content.replace(old, new)),
    }
}

/// The line containing each span's start, deduplicated, capped.
fn lines_for_spans(content: &str, spans: &[MatchSpan], cap: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous_start = usize::MAX;

    for span in spans {
        let line_start = content[..span.start].rfind('\n').map_or(0, |i| i + 1);
        if line_start == previous_start {
            continue;
        }
        previous_start = line_start;

        let line_end = content[line_start..]
            .find('\n')
            .map_or(content.len(), |i| line_start + i);
        lines.push(content[line_start..line_end].to_string());
        if lines.len() == cap {
            break;
        }
    }
    lines
}
