//! Error types for the screen mirror tool
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Main error type for the screen mirror tool
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// An external command could not be spawned at all
    #[error("Failed to launch '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    /// A bridge command ran but exited with a failure status
    #[error("Bridge command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A shell command on the device failed
    #[error("Device shell command failed: {0}")]
    ShellError(String),

    /// No bridge devices were found
    #[error("No devices found. Connect the phone via USB and enable USB debugging.")]
    NoDevicesFound,

    /// A specific serial was requested but is not attached
    #[error("No attached device with serial '{0}'")]
    DeviceNotFound(String),

    /// USB enumeration error
    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConnectorError>;

impl From<std::io::Error> for ConnectorError {
    fn from(err: std::io::Error) -> Self {
        ConnectorError::IoError(err.to_string())
    }
}
