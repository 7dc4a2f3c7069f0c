//! Bridge failure classification
//!
//! The enablement ladder needs to tell "the device wants an on-screen
//! authorization" apart from every other way a bridge command can fail. The
//! daemon reports the former only as a block of text on stderr, so the
//! distinction is a stderr classifier: [`FailureClassifier`] is the
//! capability, [`LiteralClassifier`] the default implementation matching the
//! daemon's exact wording. A different bridge version can supply its own
//! classifier without touching the ladder.

/// Full stderr block the bridge daemon emits for an unauthorized device.
///
/// CRLF line endings included; the daemon writes them even on Unix hosts
/// because the text originates from the freshly-started server process.
pub const UNAUTHORIZED_STDERR: &str = "* daemon not running; starting now at tcp:5037\r\n\
* daemon started successfully\r\n\
error: device unauthorized.\r\n\
This adb server's $ADB_VENDOR_KEYS is not set\r\n\
Try 'adb kill-server' if that seems wrong.\r\n\
Otherwise check for a confirmation dialog on your device.\r\n";

/// Category of a failed bridge command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The device is waiting for its on-screen authorization dialog
    Unauthorized,
    /// A failure worth retrying as-is (reserved for classifiers that can
    /// recognize one; the literal matcher never produces it)
    Transient,
    /// Anything the classifier does not recognize
    Unknown,
}

/// Trait for mapping bridge stderr to a failure category
pub trait FailureClassifier {
    fn classify(&self, stderr: &str) -> FailureKind;
}

/// Classifier matching the daemon's unauthorized message verbatim
///
/// The comparison is an exact string equality, not a substring search: the
/// recovery path must not fire on error text that merely mentions
/// authorization.
#[derive(Debug, Clone)]
pub struct LiteralClassifier {
    literal: String,
}

impl LiteralClassifier {
    /// Classifier matching a custom literal (for other daemon versions)
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

impl Default for LiteralClassifier {
    fn default() -> Self {
        Self::new(UNAUTHORIZED_STDERR)
    }
}

impl FailureClassifier for LiteralClassifier {
    fn classify(&self, stderr: &str) -> FailureKind {
        if stderr == self.literal {
            FailureKind::Unauthorized
        } else {
            FailureKind::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_literal_is_unauthorized() {
        let classifier = LiteralClassifier::default();
        assert_eq!(
            classifier.classify(UNAUTHORIZED_STDERR),
            FailureKind::Unauthorized
        );
    }

    #[test]
    fn test_substring_of_literal_is_unknown() {
        let classifier = LiteralClassifier::default();
        assert_eq!(
            classifier.classify("error: device unauthorized.\r\n"),
            FailureKind::Unknown
        );
    }

    #[test]
    fn test_literal_with_extra_text_is_unknown() {
        let classifier = LiteralClassifier::default();
        let padded = format!("{}extra trailing noise", UNAUTHORIZED_STDERR);
        assert_eq!(classifier.classify(&padded), FailureKind::Unknown);
    }

    #[test]
    fn test_unrelated_error_is_unknown() {
        let classifier = LiteralClassifier::default();
        assert_eq!(
            classifier.classify("adb: more than one device/emulator\n"),
            FailureKind::Unknown
        );
        assert_eq!(classifier.classify(""), FailureKind::Unknown);
    }

    #[test]
    fn test_custom_literal() {
        let classifier = LiteralClassifier::new("some other wording\n");
        assert_eq!(
            classifier.classify("some other wording\n"),
            FailureKind::Unauthorized
        );
        assert_eq!(
            classifier.classify(UNAUTHORIZED_STDERR),
            FailureKind::Unknown
        );
    }
}
