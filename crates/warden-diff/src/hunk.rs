//! Unified-diff data model.

use serde::{Deserialize, Serialize};

/// Role of one line within a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Present on both sides; anchors the hunk.
    Context,
    /// Present only on the new side.
    Added,
    /// Present only on the original side.
    Removed,
}

/// One line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkLine {
    /// Role of this line.
    pub kind: LineKind,
    /// Line content without its newline.
    pub text: String,
    /// Set when the patch marks this line with
    /// `\ No newline at end of file`.
    pub no_newline: bool,
}

impl HunkLine {
    pub(crate) fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            no_newline: false,
        }
    }
}

/// A contiguous block of change: context, removed, and added lines with
/// their declared positions on both sides.
///
/// Invariant (checked at parse time): `new_len` equals the count of
/// context plus added lines, and `original_len` the count of context plus
/// removed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// 1-based first line on the original side (0 for empty originals).
    pub original_start: usize,
    /// Line count on the original side.
    pub original_len: usize,
    /// 1-based first line on the new side.
    pub new_start: usize,
    /// Line count on the new side.
    pub new_len: usize,
    /// Hunk body in patch order.
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Lines as they appear on the original side (context + removed).
    pub(crate) fn original_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Added)
    }

    /// Lines as they appear on the new side (context + added).
    pub(crate) fn new_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Removed)
    }
}
