//! Unified diff generation.
//!
//! Uses the `similar` crate for line-by-line diffing with context.

use similar::TextDiff;

/// Generate a unified diff between two contents.
///
/// Emits standard `---`/`+++` headers, `@@` hunk headers with 3 context
/// lines, and `\ No newline at end of file` markers, so the output parses
/// back through [`crate::parse()`]. Equal contents produce an empty string
/// (callers get a uniform report shape either way).
#[must_use]
pub fn generate(original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }

    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(3)
        .header("original", "modified")
        .to_string()
}
