//! warden-sandbox - Path confinement for the Warden mutation core
//!
//! Decides whether a requested path may be touched at all: canonicalizes the
//! request against the real filesystem and accepts it only when it lands
//! inside a configured set of allowed roots.
//!
//! # Architecture
//!
//! ```text
//! warden-sandbox/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # SandboxError enum (construction-time only)
//! ├── roots.rs    # AllowedRootSet (canonical, immutable)
//! └── sandbox.rs  # PathSandbox::validate + PathValidation verdict
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_sandbox::{AllowedRootSet, PathSandbox};
//!
//! let roots = AllowedRootSet::new(["/sandbox"])?;
//! let sandbox = PathSandbox::new(roots);
//!
//! let verdict = sandbox.validate("/sandbox/a.txt".as_ref());
//! assert!(verdict.allowed);
//! ```
//!
//! This is a path-string and filesystem-metadata discipline, not OS-level
//! sandboxing: use containers or namespaces for adversarial local-process
//! threat models.

mod error;
mod roots;
mod sandbox;

pub use error::SandboxError;
pub use roots::AllowedRootSet;
pub use sandbox::{PathSandbox, PathValidation, SandboxConfig, reason};
