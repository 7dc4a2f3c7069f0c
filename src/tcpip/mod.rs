//! Wireless-enablement module
//!
//! The core of the tool: the fallback ladder that flips a USB-attached
//! device into TCP/IP listening mode, and the operator prompt used by its
//! authorization-recovery rung.
//!
//! # Submodules
//!
//! - `enabler` - The bounded fallback state machine
//! - `prompt` - Operator confirmation for the unauthorized-device path

pub mod enabler;
pub mod prompt;

// Re-export commonly used types for convenience
pub use enabler::{ConnectTarget, EnableOutcome, EnableStep, TcpipEnabler, DEFAULT_TCPIP_PORT};
pub use prompt::{ConsolePrompter, Prompter};
