//! Debug-bridge client
//!
//! The bridge is consumed as a capability: [`BridgeClient`] enumerates
//! attached devices, and each [`BridgeDevice`] handle runs shell commands on
//! its device. The production implementation drives the `adb` command-line
//! client; nothing above this module knows (or cares) how the text gets to
//! the device.

use crate::bridge::runner::CommandRunner;
use crate::core::error::{ConnectorError, Result};
use log::{debug, warn};

/// A handle to one attached device
pub trait BridgeDevice {
    /// Stable unique identifier reported by the bridge
    fn serial(&self) -> &str;

    /// Run a shell command on the device and return its output
    fn shell(&self, command: &str) -> Result<String>;
}

/// Trait for enumerating attached bridge devices
pub trait BridgeClient {
    type Device: BridgeDevice;

    /// Snapshot of currently attached devices
    fn devices(&self) -> Result<Vec<Self::Device>>;
}

/// Bridge client backed by the `adb` command-line tool
#[derive(Debug, Clone)]
pub struct CliBridgeClient<R: CommandRunner + Clone> {
    adb_path: String,
    runner: R,
}

impl<R: CommandRunner + Clone> CliBridgeClient<R> {
    pub fn new(adb_path: &str, runner: R) -> Self {
        Self {
            adb_path: adb_path.to_string(),
            runner,
        }
    }

    /// Start the bridge server and print the device table.
    ///
    /// `adb devices` starts the daemon as a side effect when it is not
    /// already running, so this doubles as a warm-up before enumeration.
    pub fn start_server(&self) -> Result<()> {
        if self.runner.run_inherited(&self.adb_path, &["devices"])? {
            Ok(())
        } else {
            Err(ConnectorError::CommandFailed {
                command: format!("{} devices", self.adb_path),
                stderr: String::new(),
            })
        }
    }
}

impl<R: CommandRunner + Clone> BridgeClient for CliBridgeClient<R> {
    type Device = CliDevice<R>;

    fn devices(&self) -> Result<Vec<CliDevice<R>>> {
        let output = self.runner.run(&self.adb_path, &["devices"])?;
        if !output.success {
            return Err(ConnectorError::CommandFailed {
                command: format!("{} devices", self.adb_path),
                stderr: output.stderr,
            });
        }

        let entries = parse_device_list(&output.stdout);
        debug!("Bridge reports {} attached device(s)", entries.len());

        Ok(entries
            .into_iter()
            .map(|entry| {
                if entry.state != "device" {
                    warn!(
                        "Device {} is in state '{}', shell commands may fail",
                        entry.serial, entry.state
                    );
                }
                CliDevice {
                    serial: entry.serial,
                    adb_path: self.adb_path.clone(),
                    runner: self.runner.clone(),
                }
            })
            .collect())
    }
}

/// A device handle scoping every command with `-s <serial>`
#[derive(Debug, Clone)]
pub struct CliDevice<R: CommandRunner> {
    serial: String,
    adb_path: String,
    runner: R,
}

impl<R: CommandRunner> BridgeDevice for CliDevice<R> {
    fn serial(&self) -> &str {
        &self.serial
    }

    fn shell(&self, command: &str) -> Result<String> {
        let output = self
            .runner
            .run(&self.adb_path, &["-s", &self.serial, "shell", command])?;

        if output.success {
            Ok(output.stdout)
        } else {
            Err(ConnectorError::ShellError(output.stderr))
        }
    }
}

/// One line of `adb devices` output
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeviceEntry {
    serial: String,
    state: String,
}

/// Parse the output of `adb devices`.
///
/// Skips the header, blank lines and the daemon-startup banner (`* ...`)
/// the server prints on its first invocation. Keeps every listed serial,
/// including `unauthorized` and `offline` entries: callers decide what to
/// do with a device that is present but not usable yet.
fn parse_device_list(output: &str) -> Vec<DeviceEntry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
                return None;
            }

            let mut tokens = line.split_whitespace();
            let serial = tokens.next()?.to_string();
            let state = tokens.next().unwrap_or("unknown").to_string();
            Some(DeviceEntry { serial, state })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_list_single() {
        let entries = parse_device_list("List of devices attached\nR58M123ABC\tdevice\n\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].serial, "R58M123ABC");
        assert_eq!(entries[0].state, "device");
    }

    #[test]
    fn test_parse_device_list_skips_daemon_banner() {
        let output = "* daemon not running; starting now at tcp:5037\n\
* daemon started successfully\n\
List of devices attached\n\
emulator-5554\tdevice\n\
R58M123ABC\tunauthorized\n\n";
        let entries = parse_device_list(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].serial, "emulator-5554");
        assert_eq!(entries[1].state, "unauthorized");
    }

    #[test]
    fn test_parse_device_list_empty() {
        assert!(parse_device_list("List of devices attached\n\n").is_empty());
        assert!(parse_device_list("").is_empty());
    }
}
