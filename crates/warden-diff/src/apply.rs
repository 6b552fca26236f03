//! Offset-tolerant hunk application.

use crate::error::DiffError;
use crate::hunk::Hunk;

/// Default search window around a hunk's declared position, in lines.
///
/// The window is deliberately bounded: unbounded fuzzy matching risks
/// applying a hunk at the wrong location silently. A hunk that cannot be
/// anchored within the window fails instead.
pub const DEFAULT_FUZZ_WINDOW: usize = 32;

/// Apply hunks to content, tolerating bounded position drift.
///
/// Hunks are applied in ascending `original_start` order with a running
/// line-offset accumulator, so later hunks account for the length changes
/// of earlier ones. Each hunk's anchor (its context and removed lines) is
/// located by exact comparison at the expected position, then at positions
/// spiraling outward up to ±`window` lines.
///
/// Application is all-or-nothing: the first unlocatable hunk aborts with
/// `DiffError::Conflict` and the caller keeps the original content.
///
/// # Errors
///
/// Returns `DiffError::Conflict` naming the first hunk whose anchor was
/// not found within the window.
pub fn apply(content: &str, hunks: &[Hunk], window: usize) -> Result<String, DiffError> {
    let mut ordered: Vec<(usize, &Hunk)> = hunks.iter().enumerate().collect();
    ordered.sort_by_key(|(_, hunk)| hunk.original_start);

    let (mut lines, mut trailing_newline) = split_lines(content);
    let mut offset: isize = 0;

    for (hunk_index, hunk) in ordered {
        let anchor: Vec<&str> = hunk.original_side().map(|l| l.text.as_str()).collect();
        let replacement: Vec<(&str, bool)> = hunk
            .new_side()
            .map(|l| (l.text.as_str(), l.no_newline))
            .collect();

        // Declared position, shifted by the net effect of earlier hunks.
        let declared = isize::try_from(hunk.original_start.saturating_sub(1)).unwrap_or(isize::MAX);
        let expected = declared.saturating_add(offset);

        let position = if anchor.is_empty() {
            // Pure insertion (for example into an empty file): no anchor
            // to search for, trust the declared position.
            Some(clamp_index(expected, lines.len()))
        } else {
            locate(&lines, &anchor, expected, window)
        };

        let Some(position) = position else {
            return Err(DiffError::Conflict { hunk_index });
        };

        let reaches_end = position + anchor.len() == lines.len();
        lines.splice(
            position..position + anchor.len(),
            replacement.iter().map(|(text, _)| (*text).to_string()),
        );

        if reaches_end {
            // The hunk rewrote the end of the file; the patch decides
            // whether the result keeps a trailing newline.
            trailing_newline = match replacement.last() {
                Some((_, no_newline)) => !no_newline,
                None => true,
            };
        }

        offset += isize::try_from(replacement.len()).unwrap_or(0)
            - isize::try_from(anchor.len()).unwrap_or(0);
    }

    let mut output = lines.join("\n");
    if trailing_newline && !output.is_empty() {
        output.push('\n');
    }
    Ok(output)
}

/// Split into lines without newlines, remembering whether the content ends
/// with one.
fn split_lines(content: &str) -> (Vec<String>, bool) {
    if content.is_empty() {
        return (Vec::new(), false);
    }
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    let trailing = matches!(lines.last().map(String::as_str), Some(""));
    if trailing {
        lines.pop();
    }
    (lines, trailing)
}

fn clamp_index(expected: isize, len: usize) -> usize {
    usize::try_from(expected.max(0)).unwrap_or(0).min(len)
}

/// Find the anchor at the expected position or within ±`window` lines of
/// it, preferring the smallest displacement.
fn locate(lines: &[String], anchor: &[&str], expected: isize, window: usize) -> Option<usize> {
    let upper = lines.len().checked_sub(anchor.len())?;

    let window = isize::try_from(window).unwrap_or(isize::MAX);
    for displacement in 0..=window {
        for candidate in [expected - displacement, expected + displacement] {
            let Ok(candidate) = usize::try_from(candidate) else {
                continue;
            };
            if candidate <= upper && matches_at(lines, candidate, anchor) {
                return Some(candidate);
            }
            if displacement == 0 {
                break;
            }
        }
    }
    None
}

fn matches_at(lines: &[String], position: usize, anchor: &[&str]) -> bool {
    anchor
        .iter()
        .zip(&lines[position..])
        .all(|(expected, actual)| *expected == actual.as_str())
}
