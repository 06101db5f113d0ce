//! Pure planning logic: identity resolution, checkout steps and launch plans
//!
//! Nothing in here performs I/O; the coordinator feeds these functions the
//! results of the collaborator traits and executes what they return.

pub mod command;
pub mod identity;
pub mod launch;
pub mod repositories;

pub use command::CommandSpec;
pub use identity::{LocalAddress, NodeIdentity};
pub use launch::{LaunchPlan, PreambleStep};
pub use repositories::Checkout;
