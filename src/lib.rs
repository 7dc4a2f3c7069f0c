//! Screen Mirror Tool Library
//!
//! Connects a PC to an Android phone's debug bridge over USB, switches the
//! connection to a wireless (TCP/IP) transport, and hands the address to a
//! screen-mirroring tool so the display streams without a cable.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`bridge`] - Debug-bridge collaborators: process invocation, device
//!   enumeration/shell access, and stderr classification, all behind
//!   capability traits
//! - [`tcpip`] - The wireless-enablement fallback ladder (the core) and the
//!   operator prompt for its authorization-recovery rung
//! - [`device`] - Device inspection, the saved-device JSON store, and USB
//!   presence checks
//! - [`mirror`] - Launcher for the external mirroring tool
//! - [`core`] - Configuration and error types
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use screen_mirror_tool::bridge::classify::LiteralClassifier;
//! use screen_mirror_tool::bridge::runner::SystemRunner;
//! use screen_mirror_tool::tcpip::{ConnectTarget, ConsolePrompter, TcpipEnabler};
//!
//! let runner = SystemRunner;
//! let classifier = LiteralClassifier::default();
//! let prompter = ConsolePrompter;
//!
//! let target = ConnectTarget::new("R58M123ABC", "192.168.2.10");
//! let enabler = TcpipEnabler::new("adb", 5555, target, &runner, &classifier, &prompter);
//!
//! match enabler.run() {
//!     outcome if outcome.succeeded() => println!("device is listening"),
//!     outcome => println!("enablement ended with {:?}", outcome),
//! }
//! ```
//!
//! Every collaborator that crosses a process or console boundary is a trait
//! (`CommandRunner`, `BridgeClient`, `FailureClassifier`, `Prompter`), so
//! the ladder and the thin adapters around it are testable without a phone
//! attached.
//!
//! # Platform Support
//!
//! The tool shells out to `adb` and `scrcpy` and enumerates USB devices via
//! libusb, so it runs wherever those are available (Linux, macOS, Windows).

pub mod bridge;
pub mod cli;
pub mod core;
pub mod device;
pub mod mirror;
pub mod tcpip;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
