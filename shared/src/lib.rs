//! Shared types for the consensus node bootstrapper
//!
//! Contains the process identity used to tag every log line and the
//! tracing helpers used by all crates in the workspace.

pub mod logging;
pub mod types;

pub use types::*;
