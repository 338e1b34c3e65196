//! Authentication outcomes published to the screen.

use crate::config::messages;
use std::fmt;

/// The closed set of results an authentication attempt can end in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No biometric sensor is present.
    HardwareUnavailable,
    /// A sensor exists but cannot be used right now.
    HardwareTemporarilyUnavailable,
    /// No biometric credential is registered for the user.
    NotEnrolled,
    Succeeded,
    /// A matching attempt failed; the prompt stays open.
    Failed,
    /// Platform-supplied diagnostic, shown verbatim.
    Error(String),
}

impl AuthOutcome {
    /// Text shown on the screen for this outcome.
    pub fn message(&self) -> &str {
        match self {
            AuthOutcome::HardwareUnavailable => messages::HARDWARE_UNAVAILABLE,
            AuthOutcome::HardwareTemporarilyUnavailable => {
                messages::HARDWARE_TEMPORARILY_UNAVAILABLE
            }
            AuthOutcome::NotEnrolled => messages::NOT_ENROLLED,
            AuthOutcome::Succeeded => messages::SUCCEEDED,
            AuthOutcome::Failed => messages::FAILED,
            AuthOutcome::Error(message) => message,
        }
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
