//! `codex-agent` — async wrapper around the external `codex` CLI.
//!
//! ```text
//! CodexClient       ← `is_available` (PATH lookup), `version`, `exec`
//!     │
//!     ▼
//! execute_command   ← tokio::process with capture + timeout/kill
//!     │
//!     ▼
//! classify          ← stderr / exit code → ErrorCategory + suggestion
//! ```
//!
//! Nothing here retries; callers decide what to do with a failure.

pub mod classify;
pub mod client;
pub mod error;
pub mod process;

pub use classify::{classify, ErrorCategory};
pub use client::CodexClient;
pub use error::CodexError;
pub use process::{execute_command, ExecOptions, ExecutionResult};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, CodexError>;
