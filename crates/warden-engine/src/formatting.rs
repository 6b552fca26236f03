//! Formatting detection and post-edit normalization.
//!
//! Conventions are detected once from the original content, before any edit
//! runs; normalization then only touches lines the edits introduced, so
//! pre-existing lines stay byte-identical.

use std::collections::HashSet;

use crate::types::{Formatting, IndentStyle, LineEnding};

/// Fallback indent width when the content has no indented lines.
const DEFAULT_INDENT_SIZE: usize = 4;

/// Detect the indentation and line-ending conventions of `content`.
#[must_use]
pub fn detect(content: &str) -> Formatting {
    let crlf = content.matches("\r\n").count();
    let newlines = content.matches('\n').count();
    // Dominant ending wins; a tie (including no newlines at all) means LF.
    let line_ending = if crlf * 2 > newlines {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    };

    let mut tab_lines = 0usize;
    let mut space_lines = 0usize;
    let mut min_space_indent: Option<usize> = None;

    for line in content.lines() {
        if line.starts_with('\t') {
            tab_lines += 1;
        } else {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            if spaces > 0 && !line[spaces..].is_empty() {
                space_lines += 1;
                min_space_indent = Some(min_space_indent.map_or(spaces, |m| m.min(spaces)));
            }
        }
    }

    let indent_style = if tab_lines > space_lines {
        IndentStyle::Tabs
    } else {
        IndentStyle::Spaces
    };
    let indent_size = match indent_style {
        IndentStyle::Tabs => 1,
        // The smallest non-zero indent is the indent unit.
        IndentStyle::Spaces => min_space_indent.unwrap_or(DEFAULT_INDENT_SIZE),
    };

    Formatting {
        indent_style,
        indent_size,
        line_ending,
    }
}

/// Normalize the lines of `modified` that do not appear in `original`.
///
/// Freshly introduced lines get trailing whitespace stripped and their
/// ending set to the detected convention. Lines carried over from the
/// original (compared with their terminator) are emitted verbatim, so an
/// edit can never reformat content it did not touch.
#[must_use]
pub fn normalize(original: &str, modified: &str, formatting: Formatting) -> String {
    let untouched: HashSet<&str> = original.split_inclusive('\n').collect();

    let mut output = String::with_capacity(modified.len());
    for segment in modified.split_inclusive('\n') {
        if untouched.contains(segment) {
            output.push_str(segment);
            continue;
        }
        let had_newline = segment.ends_with('\n');
        output.push_str(segment.trim_end());
        if had_newline {
            output.push_str(formatting.line_ending.as_str());
        }
    }
    output
}
