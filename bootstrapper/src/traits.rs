//! Collaborator seams with mockall annotations for testing
//!
//! Everything that touches the host (subprocesses, network interfaces, the
//! file system) sits behind one of these traits so the coordinator can be
//! exercised end to end with mocks.

use std::path::Path;

use crate::core::{CommandSpec, LocalAddress};
use crate::error::BootstrapResult;

/// Runs a command to completion, streaming its merged output
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` and wait for it to exit
    ///
    /// # Returns
    /// The child's exit code, or `128 + signal` if it was killed by a signal
    async fn run(&self, command: &CommandSpec) -> BootstrapResult<i32>;
}

/// Enumerates addresses bound to local network interfaces
#[mockall::automock]
pub trait InterfaceSource: Send + Sync {
    /// All local addresses, in interface enumeration order
    fn local_addresses(&self) -> BootstrapResult<Vec<LocalAddress>>;
}

/// File system operations the bootstrapper performs itself
#[mockall::automock]
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether a path exists; an inaccessible path is an error, not `false`
    async fn exists(&self, path: &Path) -> BootstrapResult<bool>;

    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> BootstrapResult<()>;

    /// Remove a directory tree; a missing directory is not an error
    async fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()>;
}
