//! External-process invocation
//!
//! The whole tool shells out for its real work (`adb`, `scrcpy`), so process
//! invocation is abstracted behind [`CommandRunner`] and injected wherever a
//! command is issued. [`SystemRunner`] is the production implementation;
//! tests script a fake instead of spawning anything.
//!
//! Invocations block until the child exits. No timeout is applied, so a hung
//! external tool hangs the invocation with it.

use crate::core::error::{ConnectorError, Result};
use std::process::Command;

/// Captured result of a finished external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the command exited with status zero
    pub success: bool,
    /// Captured standard output, lossily decoded
    pub stdout: String,
    /// Captured standard error, lossily decoded
    pub stderr: String,
}

impl CommandOutput {
    /// A successful invocation with the given stdout
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// A failed invocation with the given stderr
    pub fn failed(stderr: &str) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Trait for invoking external commands
///
/// `run` captures output and is used wherever stderr is inspected
/// afterwards; `run_inherited` hands the child the parent's stdio and is
/// used for tools the operator watches directly (`adb devices`, scrcpy).
pub trait CommandRunner {
    /// Run a command to completion, capturing its output.
    ///
    /// A non-zero exit is not an `Err`: it comes back as a `CommandOutput`
    /// with `success == false` so callers can inspect the captured stderr.
    /// `Err` means the command could not be spawned at all.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a command to completion with inherited stdio.
    ///
    /// Returns whether the command exited with status zero.
    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<bool>;
}

/// Production runner backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ConnectorError::SpawnFailed {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<bool> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| ConnectorError::SpawnFailed {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_builders() {
        let ok = CommandOutput::ok("hello");
        assert!(ok.success);
        assert_eq!(ok.stdout, "hello");
        assert!(ok.stderr.is_empty());

        let failed = CommandOutput::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.stderr, "boom");
        assert!(failed.stdout.is_empty());
    }

    #[test]
    fn test_spawn_failure_is_err() {
        let runner = SystemRunner;
        let result = runner.run("definitely-not-a-real-binary-name", &[]);
        assert!(matches!(
            result,
            Err(ConnectorError::SpawnFailed { .. })
        ));
    }
}
