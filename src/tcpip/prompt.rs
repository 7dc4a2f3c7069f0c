//! Operator prompt for the authorization recovery path
//!
//! When the bridge reports a device as unauthorized, the operator has to
//! confirm a dialog on the phone before anything can proceed. The prompt is
//! a capability so the enablement ladder can block on a real console in
//! production and on a counting fake in tests.

use dialoguer::Input;
use log::warn;

/// Trait for asking the operator to confirm the on-device dialog
pub trait Prompter {
    /// Block until the operator signals the dialog is handled.
    ///
    /// Any input (including just Enter) means "proceed"; there is no way
    /// to decline here, matching the on-device dialog being the real gate.
    fn confirm_authorization(&self);
}

/// Console-backed prompter
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm_authorization(&self) {
        let result = Input::<String>::new()
            .with_prompt(
                "Device unauthorized. Check for a confirmation dialog on your phone, \
confirm it, then press Enter to continue",
            )
            .allow_empty(true)
            .interact_text();

        if let Err(e) = result {
            // Console gone (EOF, redirected stdin): proceed anyway
            warn!("Could not read authorization confirmation: {}", e);
        }
    }
}
