//! Screen mirror launcher
//!
//! Hands a wireless address to the external mirroring tool. The launcher
//! blocks until the mirroring session ends; a failed launch or a non-zero
//! exit is reported to the operator and swallowed, never raised and never
//! retried.

use crate::bridge::runner::CommandRunner;
use log::{error, info};

/// Launcher for the external mirroring tool
pub struct MirrorLauncher<'a, R: CommandRunner> {
    scrcpy_path: String,
    runner: &'a R,
}

impl<'a, R: CommandRunner> MirrorLauncher<'a, R> {
    pub fn new(scrcpy_path: &str, runner: &'a R) -> Self {
        Self {
            scrcpy_path: scrcpy_path.to_string(),
            runner,
        }
    }

    /// Mirror the device listening at `address` over the wireless transport.
    ///
    /// Blocks until the session ends.
    pub fn mirror(&self, address: &str) {
        info!("Launching {} against {}", self.scrcpy_path, address);
        let tcpip_arg = format!("--tcpip={}", address);

        match self.runner.run_inherited(&self.scrcpy_path, &[&tcpip_arg]) {
            Ok(true) => {
                info!("Mirroring session for {} ended", address);
            }
            Ok(false) => {
                eprintln!("TCP/IP connection failed. Please connect the phone via USB.");
                error!("Mirroring tool exited with failure for {}", address);
            }
            Err(e) => {
                eprintln!("Could not launch {}: {}", self.scrcpy_path, e);
                error!("Mirroring tool launch failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::runner::CommandOutput;
    use crate::core::error::{ConnectorError, Result};
    use std::cell::RefCell;

    /// Runner recording the launch and answering with a fixed exit result
    struct FixedRunner {
        exit_ok: bool,
        spawn_fails: bool,
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl FixedRunner {
        fn new(exit_ok: bool, spawn_fails: bool) -> Self {
            Self {
                exit_ok,
                spawn_fails,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FixedRunner {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
            unreachable!("the launcher only uses inherited stdio")
        }

        fn run_inherited(&self, program: &str, args: &[&str]) -> Result<bool> {
            self.calls.borrow_mut().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            if self.spawn_fails {
                return Err(ConnectorError::SpawnFailed {
                    program: program.to_string(),
                    message: "not found".to_string(),
                });
            }
            Ok(self.exit_ok)
        }
    }

    #[test]
    fn test_mirror_passes_tcpip_argument() {
        let runner = FixedRunner::new(true, false);
        MirrorLauncher::new("scrcpy", &runner).mirror("192.168.2.10");

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "scrcpy");
        assert_eq!(calls[0].1, vec!["--tcpip=192.168.2.10"]);
    }

    #[test]
    fn test_mirror_swallows_nonzero_exit() {
        let runner = FixedRunner::new(false, false);
        // Must not panic or retry
        MirrorLauncher::new("scrcpy", &runner).mirror("192.168.2.10");
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_mirror_swallows_launch_failure() {
        let runner = FixedRunner::new(false, true);
        MirrorLauncher::new("/nonexistent/scrcpy", &runner).mirror("192.168.2.10");
        assert_eq!(runner.calls.borrow().len(), 1);
    }
}
