//! Bootstrapper error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("You must specify node ips separated by commas with --ips=")]
    EmptyPeerList,

    #[error("Peer at position {position} in --ips is empty")]
    EmptyPeer { position: usize },

    #[error("Peer {address} appears more than once in --ips")]
    DuplicatePeer { address: String },

    #[error("You must specify an amount of failures with --failures= for {algorithm}")]
    MissingFailures { algorithm: String },

    #[error("Failures must be less than {peers} nodes (got {failures})")]
    FailuresOutOfBounds { failures: u32, peers: usize },

    #[error("Can't find host: no local interface address is listed in {peers}")]
    HostNotFound { peers: String },

    #[error("Ambiguous host: local addresses {candidates} all appear in the peer list")]
    AmbiguousHost { candidates: String },

    #[error("Failed to enumerate network interfaces: {message}")]
    InterfaceEnumeration { message: String },

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Step '{step}' exited with status {code}")]
    StepFailed { step: String, code: i32 },

    #[error("File system operation failed: {operation} on {}", .path.display())]
    FileSystemError {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl BootstrapError {
    /// Build a file system error for an operation on a path
    pub fn file_system(operation: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystemError {
            operation: operation.to_string(),
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while validating the invocation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPeerList
                | Self::EmptyPeer { .. }
                | Self::DuplicatePeer { .. }
                | Self::MissingFailures { .. }
                | Self::FailuresOutOfBounds { .. }
        )
    }
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;
