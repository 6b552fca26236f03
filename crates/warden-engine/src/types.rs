//! Wire-facing edit and report types.

use serde::{Deserialize, Serialize};

use warden_diff::DEFAULT_FUZZ_WINDOW;
use warden_types::{OperationKind, ReasonCode};

/// One requested edit, as supplied by the caller.
///
/// Immutable once constructed; validation happens at application time so a
/// bad edit produces an [`EditOutcome`] rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditOperation {
    /// Replace occurrences of an exact substring.
    Literal {
        /// Text to find.
        old: String,
        /// Text to substitute.
        new: String,
    },
    /// Replace pattern matches.
    Regex {
        /// Pattern source, validated before execution.
        pattern: String,
        /// Replacement with `$1` / `$name` capture references.
        replacement: String,
        /// JavaScript-style flags (`g`, `i`, `m`, `s`, `x`, `u`).
        #[serde(default)]
        flags: String,
    },
    /// Apply a unified diff.
    DiffPatch {
        /// Unified-diff text.
        patch: String,
    },
}

impl EditOperation {
    pub(crate) const fn kind(&self) -> EditKind {
        match self {
            Self::Literal { .. } => EditKind::Literal,
            Self::Regex { .. } => EditKind::Regex,
            Self::DiffPatch { .. } => EditKind::DiffPatch,
        }
    }
}

/// Which arm of [`EditOperation`] an outcome describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Exact-substring replacement.
    Literal,
    /// Pattern replacement.
    Regex,
    /// Unified-diff application.
    DiffPatch,
}

/// Status of one applied edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// The edit applied exactly once.
    Success,
    /// Nothing matched; content is byte-identical to the input.
    NoMatch,
    /// More than one occurrence matched. All were replaced, but the edit is
    /// flagged: silent many-fold replacement is a common mistake source.
    MultipleMatches,
    /// The edit could not be applied at all; content is untouched by it.
    Failed,
}

impl EditStatus {
    /// Ordering for aggregate reporting: `failed` dominates, then the two
    /// warning states, then `success`.
    const fn severity(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoMatch => 1,
            Self::MultipleMatches => 2,
            Self::Failed => 3,
        }
    }
}

/// Result of one edit, in input order.
///
/// One outcome is produced per input operation and never dropped, even on
/// failure; callers need the full accounting to correct a partially
/// successful request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    /// Zero-based position of the edit in the request.
    pub index: usize,
    /// Which kind of edit this was.
    pub kind: EditKind,
    /// How the edit fared.
    pub status: EditStatus,
    /// Occurrences replaced (literal/regex) or hunks applied (diff).
    pub match_count: usize,
    /// Up to three sample matching lines for `multiple_matches`, or the
    /// failure description for `failed`.
    pub samples: Vec<String>,
    /// Failure taxonomy code when `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}

/// Indentation character convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    /// Leading tabs.
    Tabs,
    /// Leading spaces.
    Spaces,
}

/// Line-ending convention. Mixed files resolve to the dominant ending,
/// ties to LF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// The ending as written to content.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Formatting conventions detected from the original content, once per
/// request, before any edit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    /// Tabs or spaces.
    pub indent_style: IndentStyle,
    /// Indent unit width in characters (1 for tabs).
    pub indent_size: usize,
    /// Dominant line ending.
    pub line_ending: LineEnding,
}

/// Full accounting of one mutation request.
///
/// Constructed once per request and never mutated after return. The diff is
/// always present (empty when nothing changed) so the report shape is
/// uniform for audit and preview display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationReport {
    /// One outcome per input edit, in input order.
    pub outcomes: Vec<EditOutcome>,
    /// Content after all edits and formatting normalization.
    pub final_content: String,
    /// Unified diff from original to final content.
    pub diff: String,
    /// Conventions detected from the original content.
    pub formatting: Formatting,
}

impl MutationReport {
    /// Worst individual status across all outcomes.
    #[must_use]
    pub fn aggregate_status(&self) -> EditStatus {
        self.outcomes
            .iter()
            .map(|o| o.status)
            .max_by_key(|s| s.severity())
            .unwrap_or(EditStatus::Success)
    }

    /// Whether any edit changed the content.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.diff.is_empty()
    }
}

/// Knobs for [`crate::MutationEngine`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MutationOptions {
    /// Detect the original's formatting and normalize freshly introduced
    /// lines to it (default: true).
    #[serde(default = "default_preserve_formatting")]
    pub preserve_formatting: bool,
    /// Search window for diff hunk anchoring, in lines.
    #[serde(default = "default_fuzz_window")]
    pub fuzz_window: usize,
    /// Wall-clock budget for one regex edit, in milliseconds.
    #[serde(default = "default_regex_timeout_millis")]
    pub regex_timeout_millis: u64,
}

const fn default_preserve_formatting() -> bool {
    true
}

const fn default_fuzz_window() -> usize {
    DEFAULT_FUZZ_WINDOW
}

const fn default_regex_timeout_millis() -> u64 {
    OperationKind::Edit.limits().max_millis
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            preserve_formatting: default_preserve_formatting(),
            fuzz_window: default_fuzz_window(),
            regex_timeout_millis: default_regex_timeout_millis(),
        }
    }
}
