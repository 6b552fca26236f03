//! warden-engine - Edit application and the file mutation pipeline
//!
//! Applies ordered literal, regex, and unified-diff edits to text content
//! already cleared by the path sandbox and safety gate, producing a full
//! per-edit accounting and a unified diff of the net change.
//!
//! # Architecture
//!
//! ```text
//! warden-engine/src/
//! ├── lib.rs         # Re-exports (this file)
//! ├── error.rs       # MutateError enum
//! ├── types.rs       # EditOperation / EditOutcome / MutationReport
//! ├── formatting.rs  # Convention detection + new-line normalization
//! ├── engine.rs      # MutationEngine::apply (pure, no disk access)
//! └── pipeline.rs    # Mutator: sandbox -> gate -> read -> apply -> persist
//! ```
//!
//! The engine itself never writes to disk. [`Mutator::mutate_file`] wraps
//! it with validation and persistence, and a dry run takes exactly the same
//! path minus the final write.
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_engine::{EditOperation, MutationEngine};
//!
//! let engine = MutationEngine::new();
//! let report = engine.apply("foo foo\n", &[EditOperation::Literal {
//!     old: "foo".to_string(),
//!     new: "bar".to_string(),
//! }]);
//! assert_eq!(report.final_content, "bar bar\n");
//! assert_eq!(report.outcomes[0].match_count, 2);
//! ```

mod engine;
mod error;
mod formatting;
mod pipeline;
mod types;

pub use engine::MutationEngine;
pub use error::MutateError;
pub use formatting::{detect, normalize};
pub use pipeline::{Mutator, MutatorConfig};
pub use types::{
    EditKind, EditOperation, EditOutcome, EditStatus, Formatting, IndentStyle, LineEnding,
    MutationOptions, MutationReport,
};
