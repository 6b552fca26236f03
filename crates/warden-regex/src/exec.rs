//! Budgeted pattern execution.
//!
//! The `regex` crate's engine is linear-time, so runaway backtracking is
//! impossible by construction; the wall-clock budget here bounds pathological
//! match *counts* on very large inputs and keeps the contract uniform with
//! the original system's timeout race.

use std::time::{Duration, Instant};

use regex::RegexBuilder;

use crate::error::RegexError;
use crate::validate;

/// Compiled-pattern size cap. Pathological compilations fail fast instead of
/// allocating without bound.
const COMPILED_SIZE_LIMIT: usize = 4 * 1024 * 1024;

/// One match location within the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
}

/// Result of a budgeted match enumeration.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// Matches found before the budget expired, in text order.
    pub matches: Vec<MatchSpan>,
    /// Whether enumeration stopped because the budget ran out.
    ///
    /// When set, the caller must treat the whole edit as failed; a partial
    /// match list must never be partially applied.
    pub timed_out: bool,
}

/// A pattern that has passed static validation and compiled under the size
/// cap.
///
/// Construction is the only path to execution, so a pattern rejected by
/// [`validate::validate`] can never be executed.
#[derive(Debug, Clone)]
pub struct BoundedRegex {
    regex: regex::Regex,
    global: bool,
}

impl BoundedRegex {
    /// Validate and compile a pattern with JavaScript-style flags.
    ///
    /// Supported flags: `g` (replace all occurrences rather than the first),
    /// `i` (case-insensitive), `m` (multi-line anchors), `s` (dot matches
    /// newline), `x` (ignore pattern whitespace).
    ///
    /// # Errors
    ///
    /// Returns `RegexError::DangerousPattern` when the static screen rejects
    /// the pattern, `RegexError::UnknownFlag` for unsupported flags, and
    /// `RegexError::Compile` for invalid syntax.
    pub fn compile(pattern: &str, flags: &str) -> Result<Self, RegexError> {
        validate::validate(pattern)?;

        let mut builder = RegexBuilder::new(pattern);
        builder.size_limit(COMPILED_SIZE_LIMIT);

        let mut global = false;
        for flag in flags.chars() {
            match flag {
                'g' => global = true,
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                // Unicode matching is the engine default.
                'u' => {}
                other => return Err(RegexError::UnknownFlag(other)),
            }
        }

        let regex = builder
            .build()
            .map_err(|e| RegexError::Compile(e.to_string()))?;
        Ok(Self { regex, global })
    }

    /// Whether the `g` flag was supplied.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.global
    }

    /// Enumerate matches under a wall-clock budget.
    ///
    /// The deadline is checked between matches; enumeration is abandoned
    /// (not partially reported) once it passes.
    #[must_use]
    pub fn execute(&self, text: &str, budget: Duration) -> ExecOutcome {
        let deadline = Instant::now() + budget;
        let mut matches = Vec::new();

        for found in self.regex.find_iter(text) {
            if Instant::now() > deadline {
                return ExecOutcome {
                    matches: Vec::new(),
                    timed_out: true,
                };
            }
            matches.push(MatchSpan {
                start: found.start(),
                end: found.end(),
            });
            if !self.global {
                // Replace-first semantics never need more than one match.
                break;
            }
        }

        ExecOutcome {
            matches,
            timed_out: false,
        }
    }

    /// Apply the replacement according to the flags: all occurrences under
    /// `g`, the first occurrence otherwise.
    ///
    /// Replacement strings use `$1` / `$name` capture references.
    #[must_use]
    pub fn rewrite(&self, text: &str, replacement: &str) -> String {
        if self.global {
            self.regex.replace_all(text, replacement).into_owned()
        } else {
            self.regex.replace(text, replacement).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangerous_pattern_never_compiles() {
        assert!(matches!(
            BoundedRegex::compile("(a+)+", ""),
            Err(RegexError::DangerousPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_syntax_fails_compile() {
        assert!(matches!(
            BoundedRegex::compile("(unclosed", ""),
            Err(RegexError::Compile(_))
        ));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(matches!(
            BoundedRegex::compile("abc", "gy"),
            Err(RegexError::UnknownFlag('y'))
        ));
    }

    #[test]
    fn test_global_enumerates_all_matches() {
        let re = BoundedRegex::compile("foo", "g").unwrap();
        let outcome = re.execute("foo bar foo", Duration::from_secs(1));
        assert!(!outcome.timed_out);
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0], MatchSpan { start: 0, end: 3 });
        assert_eq!(outcome.matches[1], MatchSpan { start: 8, end: 11 });
    }

    #[test]
    fn test_non_global_stops_after_first() {
        let re = BoundedRegex::compile("foo", "").unwrap();
        let outcome = re.execute("foo bar foo", Duration::from_secs(1));
        assert_eq!(outcome.matches.len(), 1);
    }

    #[test]
    fn test_case_insensitive_flag() {
        let re = BoundedRegex::compile("warden", "i").unwrap();
        let outcome = re.execute("WARDEN core", Duration::from_secs(1));
        assert_eq!(outcome.matches.len(), 1);
    }

    #[test]
    fn test_rewrite_global_vs_first() {
        let all = BoundedRegex::compile("a", "g").unwrap();
        assert_eq!(all.rewrite("a-a-a", "b"), "b-b-b");

        let first = BoundedRegex::compile("a", "").unwrap();
        assert_eq!(first.rewrite("a-a-a", "b"), "b-a-a");
    }

    #[test]
    fn test_rewrite_capture_reference() {
        let re = BoundedRegex::compile(r"(\d+)ms", "g").unwrap();
        assert_eq!(re.rewrite("took 15ms", "${1} milliseconds"), "took 15 milliseconds");
    }

    #[test]
    fn test_exhausted_budget_reports_timeout() {
        let re = BoundedRegex::compile("a", "g").unwrap();
        let text = "a".repeat(10_000);
        let outcome = re.execute(&text, Duration::ZERO);
        assert!(outcome.timed_out);
        assert!(outcome.matches.is_empty());
    }
}
