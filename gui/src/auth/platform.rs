//! Seam between the authentication manager and the host biometric service.

use crate::auth::{AuthOutcome, Authenticators, OutcomePublisher, PlatformVersion};
use crate::auth::authenticators::allowed_authenticators;
use crate::config::prompt;
use log::info;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of the platform capability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Success,
    NoHardware,
    HardwareUnavailable,
    NoneEnrolled,
    Other(String),
}

/// Error codes handed to [`AuthCallback::on_error`].
pub mod error_code {
    pub const HW_UNAVAILABLE: i32 = 1;
    pub const UNABLE_TO_PROCESS: i32 = 2;
    pub const CANCELED: i32 = 5;
    pub const LOCKOUT: i32 = 7;
    pub const VENDOR: i32 = 8;
    pub const USER_CANCELED: i32 = 10;
    pub const NO_BIOMETRICS: i32 = 11;
    pub const HW_NOT_PRESENT: i32 = 12;
    pub const NEGATIVE_BUTTON: i32 = 13;
}

/// What the platform prompt shows and accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    pub title: String,
    pub description: String,
    pub allowed_authenticators: Authenticators,
    /// App-supplied cancel button. `None` when the platform provides its own.
    pub negative_button_text: Option<String>,
}

impl PromptInfo {
    /// Prompt configuration for the given platform version.
    pub fn for_version(version: PlatformVersion) -> Self {
        let allowed_authenticators = allowed_authenticators(version);
        let negative_button_text = if version >= PlatformVersion::DIRECT_ENROLL {
            None
        } else {
            Some(prompt::NEGATIVE_BUTTON.to_string())
        };

        Self {
            title: prompt::TITLE.to_string(),
            description: prompt::DESCRIPTION.to_string(),
            allowed_authenticators,
            negative_button_text,
        }
    }
}

/// How the enrollment screen was left. The screen ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentResult {
    Completed,
    Failed,
    Dismissed,
}

/// Callback object the platform invokes while a prompt is open.
///
/// Every invocation becomes one publication on the outcome stream.
/// Success and errors end the attempt; a failed match leaves the prompt open.
#[derive(Debug, Clone)]
pub struct AuthCallback {
    outcomes: OutcomePublisher,
    in_flight: Arc<AtomicBool>,
}

impl AuthCallback {
    /// `in_flight` is cleared when the prompt reaches a terminal result.
    pub fn new(outcomes: OutcomePublisher, in_flight: Arc<AtomicBool>) -> Self {
        Self {
            outcomes,
            in_flight,
        }
    }

    pub fn on_succeeded(&self) {
        info!("Platform reported authentication success");
        self.finish_attempt();
        self.outcomes.publish(AuthOutcome::Succeeded);
    }

    pub fn on_failed(&self) {
        info!("Platform reported a failed match");
        self.outcomes.publish(AuthOutcome::Failed);
    }

    pub fn on_error(&self, code: i32, message: &str) {
        info!("Platform reported error {}: {}", code, message);
        self.finish_attempt();
        self.outcomes.publish(AuthOutcome::Error(message.to_string()));
    }

    // Cleared before publishing so the screen can start the next attempt on sight
    fn finish_attempt(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Host biometric service: capability query, prompt, and enrollment screen.
pub trait BiometricPlatform: Send + Sync + 'static {
    /// Query whether the given authenticator set can be used right now.
    fn can_authenticate(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = Capability> + Send;

    /// Show the prompt. Resolves once it is up; results arrive through `callback`.
    fn authenticate(
        &self,
        prompt: PromptInfo,
        callback: AuthCallback,
    ) -> impl Future<Output = ()> + Send;

    /// Open the enrollment screen and resolve when it returns control.
    fn launch_enrollment(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = EnrollmentResult> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_prompt_has_cancel_button() {
        let info = PromptInfo::for_version(PlatformVersion(29));
        assert_eq!(info.title, "Sample prompt title");
        assert_eq!(info.description, "Sample prompt description");
        assert_eq!(info.negative_button_text.as_deref(), Some("Cancel"));
        assert_eq!(info.allowed_authenticators, Authenticators::BIOMETRIC_STRONG);
    }

    #[test]
    fn modern_prompt_uses_combined_set_without_cancel() {
        let info = PromptInfo::for_version(PlatformVersion(30));
        assert_eq!(info.negative_button_text, None);
        assert_eq!(
            info.allowed_authenticators,
            Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL
        );
    }

    #[test]
    fn callbacks_publish_matching_outcomes() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();
        let callback = AuthCallback::new(publisher, Arc::new(AtomicBool::new(true)));

        callback.on_succeeded();
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Succeeded)));

        callback.on_failed();
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Failed)));

        callback.on_error(error_code::LOCKOUT, "Too many attempts");
        assert_eq!(
            stream.take_changed(),
            Ok(Some(AuthOutcome::Error("Too many attempts".to_string())))
        );
    }

    #[test]
    fn only_terminal_callbacks_end_the_attempt() {
        let in_flight = Arc::new(AtomicBool::new(true));
        let callback = AuthCallback::new(OutcomePublisher::new(), in_flight.clone());

        callback.on_failed();
        assert!(in_flight.load(Ordering::Acquire));

        callback.on_succeeded();
        assert!(!in_flight.load(Ordering::Acquire));

        in_flight.store(true, Ordering::Release);
        callback.on_error(error_code::USER_CANCELED, "Authentication canceled");
        assert!(!in_flight.load(Ordering::Acquire));
    }
}
