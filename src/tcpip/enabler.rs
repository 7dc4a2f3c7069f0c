//! Wireless-enablement fallback ladder
//!
//! Brings exactly one attached device from USB-only to TCP/IP-listening
//! state. The switch command can fail for several distinct reasons, and
//! each gets its own rung, strictly more invasive than the last:
//!
//! 1. `adb tcpip <port>` against the default target. Works when a single,
//!    already-authorized device is attached.
//! 2. The same command scoped with `-s <serial>`. Disambiguates when more
//!    than one device is attached.
//! 3. `adb kill-server` to clear a wedged daemon session, then the scoped
//!    command again. If the failure is the daemon's device-unauthorized
//!    message, block for the operator to confirm the on-device dialog and
//!    retry the scoped command exactly once; that retry's outcome is final.
//!
//! The ladder is an explicit bounded loop, not recursion, so it always
//! terminates and can honor an interrupt flag between rungs. Only an
//! exact-classified unauthorized failure reaches the interactive rung;
//! every other failure at that point is unrecoverable.

use crate::bridge::classify::{FailureClassifier, FailureKind};
use crate::bridge::runner::CommandRunner;
use crate::tcpip::prompt::Prompter;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default TCP port for wireless debugging
pub const DEFAULT_TCPIP_PORT: u16 = 5555;

/// Upper bound on ladder iterations. The ladder visits at most four rungs
/// (direct, serial, recovery, final serial retry); anything beyond that is
/// a logic error, not a legitimate path.
const MAX_STEPS: usize = 8;

/// The serial/address pair one enablement run operates on.
///
/// Built per invocation from caller input or a saved-device lookup, never
/// persisted. The address is not needed to flip the transport, it is what
/// the caller mirrors against afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub serial: String,
    pub address: String,
}

impl ConnectTarget {
    pub fn new(serial: &str, address: &str) -> Self {
        Self {
            serial: serial.to_string(),
            address: address.to_string(),
        }
    }
}

/// Which rung of the ladder produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableStep {
    /// Plain `tcpip` against the default target
    Direct,
    /// Serial-scoped `tcpip`
    Serial,
    /// Daemon restart, optionally followed by the authorization prompt
    AuthRecovery,
}

/// Final result of one ladder run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    /// The device is now listening on the wireless port
    Success(EnableStep),
    /// Every rung failed, or an unrecognized error ended the recovery rung
    Fatal,
    /// The interrupt flag was raised between rungs
    Interrupted,
}

impl EnableOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, EnableOutcome::Success(_))
    }
}

/// Internal loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Direct,
    /// `last_resort` marks the post-prompt retry, whose failure is final
    Serial { last_resort: bool },
    AuthRecovery,
}

/// The fallback ladder, with every collaborator injected
pub struct TcpipEnabler<'a, R, C, P>
where
    R: CommandRunner,
    C: FailureClassifier,
    P: Prompter,
{
    adb_path: String,
    port: u16,
    target: ConnectTarget,
    runner: &'a R,
    classifier: &'a C,
    prompter: &'a P,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<'a, R, C, P> TcpipEnabler<'a, R, C, P>
where
    R: CommandRunner,
    C: FailureClassifier,
    P: Prompter,
{
    pub fn new(
        adb_path: &str,
        port: u16,
        target: ConnectTarget,
        runner: &'a R,
        classifier: &'a C,
        prompter: &'a P,
    ) -> Self {
        Self {
            adb_path: adb_path.to_string(),
            port,
            target,
            runner,
            classifier,
            prompter,
            interrupt: None,
        }
    }

    /// Check an interrupt flag between rungs
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// The target this enabler operates on
    pub fn target(&self) -> &ConnectTarget {
        &self.target
    }

    /// Legacy entry point: runs the ladder and reports failure
    /// unconditionally, even when a rung succeeded.
    ///
    /// Historical callers treated this result as "go re-verify the device
    /// yourself" rather than as the actual outcome, and the behavior is
    /// kept until they are audited. The real outcome is logged and
    /// available from [`run`](Self::run), which new callers should use.
    ///
    /// TODO: audit remaining `enable()` callers, then make this return
    /// `self.run().succeeded()`.
    pub fn enable(&self) -> bool {
        let outcome = self.run();
        if let EnableOutcome::Success(step) = outcome {
            info!(
                "TCP/IP mode enabled for {} via {:?}, but reporting failure to keep the legacy contract",
                self.target.serial, step
            );
        }
        false
    }

    /// Run the ladder and return the real outcome
    pub fn run(&self) -> EnableOutcome {
        let mut state = State::Direct;

        for _ in 0..MAX_STEPS {
            if self.is_interrupted() {
                warn!("Wireless enablement interrupted before completion");
                return EnableOutcome::Interrupted;
            }

            state = match state {
                State::Direct => match self.switch_default() {
                    Ok(()) => {
                        info!("Device switched to TCP/IP mode on port {}", self.port);
                        return EnableOutcome::Success(EnableStep::Direct);
                    }
                    Err(stderr) => {
                        error!("Direct tcpip switch failed: {}", stderr.trim_end());
                        State::Serial { last_resort: false }
                    }
                },

                State::Serial { last_resort } => match self.switch_scoped() {
                    Ok(()) => {
                        info!(
                            "Device {} switched to TCP/IP mode on port {}",
                            self.target.serial, self.port
                        );
                        let step = if last_resort {
                            EnableStep::AuthRecovery
                        } else {
                            EnableStep::Serial
                        };
                        return EnableOutcome::Success(step);
                    }
                    Err(stderr) => {
                        error!(
                            "Serial-scoped tcpip switch for {} failed: {}",
                            self.target.serial,
                            stderr.trim_end()
                        );
                        if last_resort {
                            error!(
                                "Retry after authorization failed, wireless enablement is unrecoverable"
                            );
                            return EnableOutcome::Fatal;
                        }
                        State::AuthRecovery
                    }
                },

                State::AuthRecovery => {
                    if let Err(stderr) = self.kill_server() {
                        error!("Bridge daemon restart failed: {}", stderr.trim_end());
                        match self.recover_or_fatal(&stderr) {
                            Some(next) => next,
                            None => return EnableOutcome::Fatal,
                        }
                    } else {
                        match self.switch_scoped() {
                            Ok(()) => {
                                info!(
                                    "Device {} switched to TCP/IP mode after daemon restart",
                                    self.target.serial
                                );
                                return EnableOutcome::Success(EnableStep::AuthRecovery);
                            }
                            Err(stderr) => {
                                error!(
                                    "Post-restart tcpip switch for {} failed: {}",
                                    self.target.serial,
                                    stderr.trim_end()
                                );
                                match self.recover_or_fatal(&stderr) {
                                    Some(next) => next,
                                    None => return EnableOutcome::Fatal,
                                }
                            }
                        }
                    }
                }
            };
        }

        error!("Fallback ladder exceeded its step bound without settling");
        EnableOutcome::Fatal
    }

    /// Decide whether a recovery-rung failure is the unauthorized case.
    ///
    /// Unauthorized: prompt the operator and hand back the final serial
    /// retry as the next state. Anything else: `None`, the ladder is done.
    fn recover_or_fatal(&self, stderr: &str) -> Option<State> {
        match self.classifier.classify(stderr) {
            FailureKind::Unauthorized => {
                warn!(
                    "Device {} is unauthorized, waiting for on-device confirmation",
                    self.target.serial
                );
                self.prompter.confirm_authorization();
                Some(State::Serial { last_resort: true })
            }
            FailureKind::Transient | FailureKind::Unknown => {
                error!("Wireless enablement is unrecoverable, giving up");
                None
            }
        }
    }

    /// `adb tcpip <port>` against the default target
    fn switch_default(&self) -> Result<(), String> {
        let port = self.port.to_string();
        self.run_adb(&["tcpip", &port])
    }

    /// `adb -s <serial> tcpip <port>`
    fn switch_scoped(&self) -> Result<(), String> {
        let port = self.port.to_string();
        self.run_adb(&["-s", &self.target.serial, "tcpip", &port])
    }

    /// `adb kill-server`
    fn kill_server(&self) -> Result<(), String> {
        self.run_adb(&["kill-server"])
    }

    /// Issue one bridge command; failures collapse to their stderr text,
    /// which is what the classifier operates on.
    fn run_adb(&self, args: &[&str]) -> Result<(), String> {
        match self.runner.run(&self.adb_path, args) {
            Ok(output) if output.success => Ok(()),
            Ok(output) => Err(output.stderr),
            Err(e) => Err(e.to_string()),
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}
