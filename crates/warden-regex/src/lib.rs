//! warden-regex - ReDoS-hardened pattern matching for the Warden core
//!
//! Regex and diff application run synchronously on the request path, so a
//! pathological pattern cannot be interrupted once it starts. The defense
//! is therefore layered:
//!
//! 1. **Static validation** (primary): structurally dangerous patterns
//!    (nested quantifiers like `(a+)+`, excessive group nesting, oversized
//!    patterns) are rejected before compilation.
//! 2. **Wall-clock budget** (secondary, best-effort): match enumeration
//!    checks a deadline between matches and reports `timed_out` so the
//!    caller fails the edit instead of partially applying it.
//!
//! # Architecture
//!
//! ```text
//! warden-regex/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # RegexError enum
//! ├── validate.rs  # Static ReDoS screen (primary defense)
//! └── exec.rs      # BoundedRegex: compile with flags, budgeted execute
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use warden_regex::BoundedRegex;
//!
//! let re = BoundedRegex::compile(r"v(\d+)", "g")?;
//! let outcome = re.execute("v1 v2", Duration::from_millis(100));
//! assert_eq!(outcome.matches.len(), 2);
//! ```

mod error;
mod exec;
mod validate;

pub use error::RegexError;
pub use exec::{BoundedRegex, ExecOutcome, MatchSpan};
pub use validate::{MAX_NESTING_DEPTH, MAX_PATTERN_LENGTH, validate};
