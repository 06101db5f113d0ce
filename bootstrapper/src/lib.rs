//! Consensus cluster node bootstrapper
//!
//! Given a directory, an algorithm and the static list of cluster members,
//! this library fetches and builds the engine sources, works out which member
//! the local machine is and launches the engine configured for that node.

pub mod bootstrapper;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use bootstrapper::{exit_status, Bootstrapper, DryRunReport, Outcome};
pub use config::{Algorithm, Args, IdentityPolicy, InvocationConfig};
pub use core::{CommandSpec, LaunchPlan, LocalAddress, NodeIdentity, PreambleStep};
pub use error::{BootstrapError, BootstrapResult};
pub use traits::{FileSystem, InterfaceSource, ProcessRunner};
pub use traits::{MockFileSystem, MockInterfaceSource, MockProcessRunner};
