//! Prose Patcher: offset-anchored text corrections from a remote checker
//!
//! A correction engine for prose: the buffer is checked by a remote
//! grammar/style service, which returns issues anchored by character spans,
//! and the engine applies chosen replacements back into the buffer.
//!
//! # Architecture
//!
//! All corrections compile down to a single primitive: a character-span
//! replacement ([`apply_single`]). Batch application sorts eligible issues
//! by offset descending and splices right-to-left, so no offset ever needs
//! recomputation. Intelligence lives in the remote checker; the engine only
//! applies its suggestions safely.
//!
//! # Safety
//!
//! - Spans are validated against the buffer before any splice; stale spans
//!   are rejected, never clamped
//! - Overlapping spans in a batch are rejected
//! - A check report carries the fingerprint of the text it was computed
//!   from; [`EditorSession`] refuses to install it against any other buffer
//! - Every buffer mutation drops the outstanding issue list
//!
//! # Example
//!
//! ```
//! use prose_patcher::{apply_single, Span};
//!
//! let fixed = apply_single("The quick brown fox", Span::new(4, 5), "slow").unwrap();
//! assert_eq!(fixed, "The slow brown fox");
//! ```

pub mod client;
pub mod config;
pub mod debounce;
pub mod issue;
pub mod patch;
pub mod session;

// Re-exports
pub use client::{CheckError, CheckerClient};
pub use config::{CheckerConfig, ConfigError};
pub use debounce::Debouncer;
pub use issue::{CheckResponse, Issue, IssueError};
pub use patch::{apply_batch, apply_single, BatchOutcome, PatchError, Span};
pub use session::{CheckReport, EditorSession, Fingerprint, SessionError};
