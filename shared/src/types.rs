//! Core types used throughout the bootstrapper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identifies who emitted a log line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// The bootstrapper itself, before a node identity is known
    Bootstrapper,
    /// A resolved cluster member, by 1-based ordinal
    Node(usize),
}

impl ProcessId {
    /// Initialize the global process ID for the bootstrapper
    pub fn init_bootstrapper() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Bootstrapper)
    }

    /// Get the global process ID, falling back to the bootstrapper tag
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&ProcessId::Bootstrapper)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Bootstrapper => write!(f, "bootstrapper"),
            ProcessId::Node(ordinal) => write!(f, "node-{ordinal}"),
        }
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        ProcessId::Bootstrapper
    }
}
