//! warden-gate - Operation safety limits for the Warden mutation core
//!
//! Given a path that already passed the sandbox, decides whether a specific
//! operation kind may proceed: size ceilings from the static limit table,
//! an executable-extension deny-list, and binary-content classification
//! from a bounded 8 KiB prefix.
//!
//! # Architecture
//!
//! ```text
//! warden-gate/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # GateError enum
//! ├── classify.rs  # Classify trait + PrefixClassifier (NUL scan, ratios)
//! ├── cache.rs     # ClassifierCache (TTL, explicit invalidation)
//! ├── io.rs        # Bounded async reads (full text / prefix)
//! ├── timeout.rs   # enforce_timeout for async I/O
//! └── gate.rs      # SafetyGate::check + validate_batch
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_gate::SafetyGate;
//! use warden_types::OperationKind;
//!
//! let gate = SafetyGate::new();
//! let verdict = gate.check("/sandbox/a.txt".as_ref(), OperationKind::Edit).await;
//! assert!(verdict.safe);
//! ```

mod cache;
mod classify;
mod error;
mod gate;
mod io;
mod timeout;

pub use cache::ClassifierCache;
pub use classify::{
    Classification, Classify, ContentCategory, PrefixClassifier, SNIFF_PREFIX_LEN, is_binary,
};
pub use error::GateError;
pub use gate::{BatchLimits, EXECUTABLE_EXTENSIONS, SafetyGate, SafetyResult, SizeDetails};
pub use io::{read_prefix, read_text, read_text_strict};
pub use timeout::enforce_timeout;
