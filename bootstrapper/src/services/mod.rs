//! Service implementations
//!
//! Real implementations of the collaborator traits that touch the host.

pub mod file_system;
pub mod interfaces;
pub mod output;
pub mod process_runner;

pub use file_system::RealFileSystem;
pub use interfaces::RealInterfaceSource;
pub use process_runner::RealProcessRunner;
