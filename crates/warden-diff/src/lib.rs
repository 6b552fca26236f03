//! # warden-diff
//!
//! Unified-diff parsing, generation, and offset-tolerant application.
//!
//! ## Architecture
//!
//! ```text
//! warden-diff
//! ├── hunk.rs       # Hunk / HunkLine data model
//! ├── parse.rs      # unified-diff text -> Vec<Hunk>
//! ├── generate.rs   # original + modified -> unified-diff text
//! ├── apply.rs      # hunks -> patched content, bounded fuzz window
//! └── error.rs      # DiffError
//! ```
//!
//! Application is all-or-nothing: hunks locate their context within a
//! bounded window around the declared position, and the first hunk that
//! fails to anchor aborts the whole patch. Callers keep the original
//! content on conflict.

pub mod apply;
pub mod error;
pub mod generate;
pub mod hunk;
pub mod parse;

pub use apply::{apply, DEFAULT_FUZZ_WINDOW};
pub use error::DiffError;
pub use generate::generate;
pub use hunk::{Hunk, HunkLine, LineKind};
pub use parse::parse;
