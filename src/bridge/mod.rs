//! Debug-bridge collaborators
//!
//! Everything that talks to the `adb` tool lives here, behind small
//! capability traits so the rest of the tool never touches a process
//! boundary directly:
//!
//! - `runner` - External-process invocation (`CommandRunner`)
//! - `client` - Device enumeration and per-device shell access (`BridgeClient`)
//! - `classify` - Mapping bridge stderr to a failure category (`FailureClassifier`)
//!
//! Production code wires in [`SystemRunner`], [`CliBridgeClient`] and
//! [`LiteralClassifier`]; tests substitute fakes.

pub mod classify;
pub mod client;
pub mod runner;

// Re-export commonly used types for convenience
pub use classify::{FailureClassifier, FailureKind, LiteralClassifier, UNAUTHORIZED_STDERR};
pub use client::{BridgeClient, BridgeDevice, CliBridgeClient, CliDevice};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
