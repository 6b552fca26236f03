//! Static ReDoS screening.
//!
//! Rejects structurally dangerous patterns before any compilation or
//! execution. This is the primary defense: the execution-time budget in
//! [`crate::exec`] is reporting, not prevention.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RegexError;

/// Maximum allowed pattern length.
pub const MAX_PATTERN_LENGTH: usize = 1_000;

/// Maximum nesting depth for groups.
pub const MAX_NESTING_DEPTH: usize = 5;

/// Substrings that are dangerous in any position: a quantified atom inside
/// a group that is itself quantified.
const DANGEROUS_FRAGMENTS: &[&str] = &[
    r"(\w+)+",
    r"(.*)+",
    r"(.+)+",
    r"(\d+)+",
    r"(\s+)+",
    r"(\w*)*",
    r"(.*)*",
    r"(.+)*",
    r"(\d*)*",
    r"(\s*)*",
    r"(a|a)+",
    r"(a|aa)+",
    r"(.*|.*)+",
];

// A group containing a quantifier, immediately followed by another
// quantifier: the (x+)+ shape in the general case.
static QUANTIFIED_QUANTIFIER_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^()]*[+*][^()]*\)[+*?{]").expect("Failed to compile detector pattern")
});

/// Validate a pattern for structural ReDoS risk.
///
/// Checks, in order: length cap, group nesting depth, and nested-quantifier
/// constructs (for example `(a+)+`). A pattern rejected here never reaches
/// compilation, let alone execution.
///
/// # Errors
///
/// Returns `RegexError::DangerousPattern` naming the failed check.
pub fn validate(pattern: &str) -> Result<(), RegexError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(RegexError::DangerousPattern {
            reason: "pattern exceeds maximum length",
        });
    }

    if nesting_depth(pattern) > MAX_NESTING_DEPTH {
        return Err(RegexError::DangerousPattern {
            reason: "excessive group nesting depth",
        });
    }

    if has_nested_quantifiers(pattern) {
        return Err(RegexError::DangerousPattern {
            reason: "nested quantifiers can cause exponential backtracking",
        });
    }

    Ok(())
}

/// Maximum nesting depth of groups, ignoring escaped parentheses and
/// character classes.
fn nesting_depth(pattern: &str) -> usize {
    let mut max_depth: usize = 0;
    let mut depth: usize = 0;
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' => {
                depth = depth.saturating_sub(1);
            }
            '[' => {
                // Quantifiers and parens are literals inside a class.
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        chars.next();
                    } else if c == ']' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    max_depth
}

/// Detects a quantifier applied to a group that itself contains a
/// quantifier over an overlapping character set.
fn has_nested_quantifiers(pattern: &str) -> bool {
    if DANGEROUS_FRAGMENTS
        .iter()
        .any(|fragment| pattern.contains(fragment))
    {
        return true;
    }
    QUANTIFIED_QUANTIFIER_GROUP.is_match(pattern)
}
