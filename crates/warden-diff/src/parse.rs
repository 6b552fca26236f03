//! Unified-diff text parsing.

use crate::error::DiffError;
use crate::hunk::{Hunk, HunkLine, LineKind};

/// Parse unified-diff text into ordered hunks.
///
/// File headers (`---`/`+++`) and `diff`/`index` lines are skipped;
/// `\ No newline at end of file` markers attach to the preceding body line.
/// Hunk line counts are validated against the `@@` header in both
/// directions: a hunk carrying fewer body lines than declared and a body
/// line continuing past the declared counts are both rejected rather than
/// guessed at.
///
/// # Errors
///
/// Returns `DiffError::Parse` for text containing no hunks, an invalid
/// `@@` header, an unexpected or dangling body line, or a count mismatch.
pub fn parse(patch_text: &str) -> Result<Vec<Hunk>, DiffError> {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut current: Option<HunkBuilder> = None;

    for (line_no, raw) in patch_text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(header) = line.strip_prefix("@@ ") {
            if let Some(builder) = current.take() {
                hunks.push(builder.finish()?);
            }
            current = Some(HunkBuilder::from_header(header, line_no)?);
            continue;
        }

        let Some(builder) = current.as_mut() else {
            // Preamble: ---/+++ headers, diff/index lines, commit noise.
            continue;
        };

        if builder.is_complete() {
            if line.starts_with('\\') {
                builder.mark_no_newline();
                continue;
            }
            if let Some(finished) = current.take() {
                hunks.push(finished.finish()?);
            }
            // Between hunks only file headers and diff/index noise may
            // appear; a dangling body line means the header counts lied.
            if !line.starts_with("---")
                && !line.starts_with("+++")
                && matches!(line.chars().next(), Some(' ' | '+' | '-'))
            {
                return Err(DiffError::Parse(format!(
                    "line {} continues past its hunk's declared counts: {line:?}",
                    line_no + 1
                )));
            }
            continue;
        }

        match line.chars().next() {
            Some(' ') => builder.push(LineKind::Context, &line[1..]),
            Some('+') => builder.push(LineKind::Added, &line[1..]),
            Some('-') => builder.push(LineKind::Removed, &line[1..]),
            Some('\\') => builder.mark_no_newline(),
            // Some generators emit a bare empty line for empty context.
            None => builder.push(LineKind::Context, ""),
            Some(_) => {
                return Err(DiffError::Parse(format!(
                    "unexpected line {} inside hunk: {line:?}",
                    line_no + 1
                )));
            }
        }
    }

    if let Some(builder) = current.take() {
        hunks.push(builder.finish()?);
    }

    if hunks.is_empty() {
        return Err(DiffError::Parse("no hunks found".to_string()));
    }
    Ok(hunks)
}

struct HunkBuilder {
    hunk: Hunk,
    remaining_original: usize,
    remaining_new: usize,
}

impl HunkBuilder {
    /// Parse the `-a,b +c,d @@` part of a hunk header.
    fn from_header(header: &str, line_no: usize) -> Result<Self, DiffError> {
        let malformed =
            || DiffError::Parse(format!("invalid hunk header at line {}", line_no + 1));

        let body = header.split(" @@").next().ok_or_else(malformed)?;
        let mut parts = body.split_whitespace();
        let original = parts.next().ok_or_else(malformed)?;
        let new = parts.next().ok_or_else(malformed)?;

        let (original_start, original_len) =
            parse_range(original.strip_prefix('-').ok_or_else(malformed)?)
                .ok_or_else(malformed)?;
        let (new_start, new_len) = parse_range(new.strip_prefix('+').ok_or_else(malformed)?)
            .ok_or_else(malformed)?;

        Ok(Self {
            hunk: Hunk {
                original_start,
                original_len,
                new_start,
                new_len,
                lines: Vec::new(),
            },
            remaining_original: original_len,
            remaining_new: new_len,
        })
    }

    fn push(&mut self, kind: LineKind, text: &str) {
        match kind {
            LineKind::Context => {
                self.remaining_original = self.remaining_original.saturating_sub(1);
                self.remaining_new = self.remaining_new.saturating_sub(1);
            }
            LineKind::Removed => {
                self.remaining_original = self.remaining_original.saturating_sub(1);
            }
            LineKind::Added => {
                self.remaining_new = self.remaining_new.saturating_sub(1);
            }
        }
        self.hunk.lines.push(HunkLine::new(kind, text));
    }

    fn mark_no_newline(&mut self) {
        if let Some(last) = self.hunk.lines.last_mut() {
            last.no_newline = true;
        }
    }

    fn is_complete(&self) -> bool {
        self.remaining_original == 0 && self.remaining_new == 0 && !self.hunk.lines.is_empty()
    }

    fn finish(self) -> Result<Hunk, DiffError> {
        let context = self
            .hunk
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Context)
            .count();
        let added = self
            .hunk
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .count();
        let removed = self.hunk.lines.len() - context - added;

        if context + added != self.hunk.new_len || context + removed != self.hunk.original_len {
            return Err(DiffError::Parse(format!(
                "hunk at line {} declares -{},{} +{},{} but carries {} context / {} removed / {} added lines",
                self.hunk.original_start,
                self.hunk.original_start,
                self.hunk.original_len,
                self.hunk.new_start,
                self.hunk.new_len,
                context,
                removed,
                added,
            )));
        }
        Ok(self.hunk)
    }
}

/// Parse `start[,len]`; a missing length means 1.
fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "\
--- original
+++ modified
@@ -1,3 +1,3 @@
 line1
-line2
+changed
 line3
";

    #[test]
    fn test_parse_simple_patch() {
        let hunks = parse(SIMPLE).unwrap();
        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert_eq!(hunk.original_start, 1);
        assert_eq!(hunk.original_len, 3);
        assert_eq!(hunk.new_len, 3);
        assert_eq!(hunk.lines.len(), 4);
        assert_eq!(hunk.lines[1].kind, LineKind::Removed);
        assert_eq!(hunk.lines[1].text, "line2");
        assert_eq!(hunk.lines[2].kind, LineKind::Added);
        assert_eq!(hunk.lines[2].text, "changed");
    }

    #[test]
    fn test_parse_multiple_hunks() {
        let patch = "\
@@ -1,2 +1,2 @@
 a
-b
+B
@@ -10,2 +10,3 @@
 x
+y
 z
";
        let hunks = parse(patch).unwrap();
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[1].original_start, 10);
        assert_eq!(hunks[1].new_len, 3);
    }

    #[test]
    fn test_parse_no_newline_marker() {
        let patch = "\
@@ -1,1 +1,1 @@
-old
+new
\\ No newline at end of file
";
        let hunks = parse(patch).unwrap();
        let last = hunks[0].lines.last().unwrap();
        assert_eq!(last.kind, LineKind::Added);
        assert!(last.no_newline);
    }

    #[test]
    fn test_parse_single_line_range_shorthand() {
        let patch = "\
@@ -5 +5 @@
-a
+b
";
        let hunks = parse(patch).unwrap();
        assert_eq!(hunks[0].original_start, 5);
        assert_eq!(hunks[0].original_len, 1);
    }

    #[test]
    fn test_reject_empty_input() {
        assert!(matches!(parse(""), Err(DiffError::Parse(_))));
        assert!(matches!(parse("just some text\n"), Err(DiffError::Parse(_))));
    }

    #[test]
    fn test_reject_count_mismatch() {
        // Header claims 3 new lines but the body only carries 2.
        let patch = "\
@@ -1,2 +1,3 @@
 a
-b
+B
";
        assert!(matches!(parse(patch), Err(DiffError::Parse(_))));
    }

    #[test]
    fn test_reject_malformed_header() {
        let patch = "@@ not a header @@\n a\n";
        assert!(matches!(parse(patch), Err(DiffError::Parse(_))));
    }

    #[test]
    fn test_reject_body_line_past_declared_counts() {
        // Header declares one added line; a second one dangles after it.
        let patch = "\
@@ -1,1 +1,1 @@
-old
+new
+extra
";
        assert!(matches!(parse(patch), Err(DiffError::Parse(_))));
    }

    #[test]
    fn test_reject_dangling_context_line() {
        let patch = "\
@@ -1,1 +1,1 @@
-old
+new
 stray
";
        assert!(matches!(parse(patch), Err(DiffError::Parse(_))));
    }

    #[test]
    fn test_file_headers_between_hunks_accepted() {
        let patch = "\
--- a/one
+++ b/one
@@ -1,1 +1,1 @@
-a
+A
--- a/two
+++ b/two
@@ -1,1 +1,1 @@
-b
+B
";
        let hunks = parse(patch).unwrap();
        assert_eq!(hunks.len(), 2);
    }

    #[test]
    fn test_garbage_inside_hunk_rejected() {
        let patch = "\
@@ -1,2 +1,2 @@
 a
garbage
+B
";
        assert!(matches!(parse(patch), Err(DiffError::Parse(_))));
    }
}
