//! Screen controller: turns outcomes into text and drives the enrollment detour.

use crate::auth::authenticators::supports_enrollment_link;
use crate::auth::{
    AuthManager, AuthOutcome, Authenticators, BiometricPlatform, EnrollmentResult, OutcomeStream,
    PlatformVersion,
};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What the screen does with a newly received outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Show the text.
    Show(String),
    /// Show the text, then open the enrollment screen for `authenticators`.
    ShowAndEnroll {
        text: String,
        authenticators: Authenticators,
    },
}

impl Reaction {
    pub fn text(&self) -> &str {
        match self {
            Reaction::Show(text) | Reaction::ShowAndEnroll { text, .. } => text,
        }
    }
}

/// Decide the screen's reaction to an outcome.
pub fn react(outcome: &AuthOutcome, version: PlatformVersion) -> Reaction {
    let text = outcome.message().to_string();

    if *outcome == AuthOutcome::NotEnrolled && supports_enrollment_link(version) {
        Reaction::ShowAndEnroll {
            text,
            authenticators: Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL,
        }
    } else {
        Reaction::Show(text)
    }
}

/// The screen's view of the authentication manager.
pub struct ScreenController<P> {
    manager: Arc<AuthManager<P>>,
    enrolling: Arc<AtomicBool>,
}

impl<P> Clone for ScreenController<P> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            enrolling: self.enrolling.clone(),
        }
    }
}

impl<P: BiometricPlatform> ScreenController<P> {
    pub fn new(manager: Arc<AuthManager<P>>) -> Self {
        Self {
            manager,
            enrolling: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn outcomes(&self) -> OutcomeStream {
        self.manager.outcomes()
    }

    pub fn react(&self, outcome: &AuthOutcome) -> Reaction {
        react(outcome, self.manager.version())
    }

    /// The "Authenticate" button action. Ignored while the enrollment screen is open.
    pub async fn authenticate(&self) {
        if self.enrolling.load(Ordering::Acquire) {
            info!("Enrollment screen is open, ignoring authentication request");
            return;
        }
        info!("User requested authentication");
        self.manager.trigger_authentication().await;
    }

    /// Open the enrollment screen and authenticate again once it returns.
    ///
    /// Returns `None` without doing anything if the screen is already open.
    pub async fn enroll_then_retry(
        &self,
        authenticators: Authenticators,
    ) -> Option<EnrollmentResult> {
        if self
            .enrolling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Enrollment screen already open");
            return None;
        }

        info!("Launching enrollment screen for {}", authenticators);
        let result = self
            .manager
            .platform()
            .launch_enrollment(authenticators)
            .await;
        self.enrolling.store(false, Ordering::Release);

        // Retried whatever the enrollment result was
        info!("Enrollment screen returned ({:?}), retrying authentication", result);
        self.manager.trigger_authentication().await;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::ScriptedPlatform;
    use crate::auth::Capability;

    fn controller(
        capability: Capability,
        version: u32,
    ) -> (Arc<ScriptedPlatform>, ScreenController<ScriptedPlatform>) {
        let platform = Arc::new(ScriptedPlatform::new(capability));
        let manager = Arc::new(AuthManager::new(platform.clone(), PlatformVersion(version)));
        (platform, ScreenController::new(manager))
    }

    fn all_outcomes() -> Vec<AuthOutcome> {
        vec![
            AuthOutcome::HardwareUnavailable,
            AuthOutcome::HardwareTemporarilyUnavailable,
            AuthOutcome::NotEnrolled,
            AuthOutcome::Succeeded,
            AuthOutcome::Failed,
            AuthOutcome::Error("Sensor dirty".to_string()),
        ]
    }

    #[test]
    fn displayed_text_matches_fixed_mapping() {
        let expected = [
            "Hardware unavailable",
            "Hardware temporarily unavailable",
            "No biometric is set",
            "Authentication succeeded",
            "Authentication failed",
            "Sensor dirty",
        ];
        for (outcome, text) in all_outcomes().iter().zip(expected) {
            assert_eq!(react(outcome, PlatformVersion(30)).text(), text);
            assert_eq!(react(outcome, PlatformVersion(29)).text(), text);
        }
    }

    #[test]
    fn only_not_enrolled_on_supporting_version_enrolls() {
        for outcome in all_outcomes() {
            let reaction = react(&outcome, PlatformVersion(30));
            let enrolls = matches!(reaction, Reaction::ShowAndEnroll { .. });
            assert_eq!(enrolls, outcome == AuthOutcome::NotEnrolled, "{:?}", outcome);

            assert!(matches!(
                react(&outcome, PlatformVersion(29)),
                Reaction::Show(_)
            ));
        }
    }

    #[test]
    fn error_too_many_attempts_is_displayed_verbatim() {
        let outcome = AuthOutcome::Error("Too many attempts".to_string());
        assert_eq!(
            react(&outcome, PlatformVersion(30)),
            Reaction::Show("Too many attempts".to_string())
        );
    }

    #[tokio::test]
    async fn not_enrolled_launches_enrollment_then_retries() {
        let (platform, controller) = controller(Capability::NoneEnrolled, 30);
        let mut stream = controller.outcomes();

        controller.authenticate().await;
        assert_eq!(platform.prompt_count(), 0);

        let outcome = stream.take_changed().unwrap().expect("outcome published");
        assert_eq!(outcome, AuthOutcome::NotEnrolled);

        let Reaction::ShowAndEnroll {
            text,
            authenticators,
        } = controller.react(&outcome)
        else {
            panic!("expected enrollment");
        };
        assert_eq!(text, "No biometric is set");

        platform.set_capability(Capability::Success);
        controller.enroll_then_retry(authenticators).await;

        assert_eq!(
            platform.enrollments(),
            vec![Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL]
        );
        assert_eq!(platform.prompt_count(), 1);
    }

    #[tokio::test]
    async fn retries_exactly_once_whatever_enrollment_returns() {
        for result in [
            EnrollmentResult::Completed,
            EnrollmentResult::Failed,
            EnrollmentResult::Dismissed,
        ] {
            let (platform, controller) = controller(Capability::Success, 30);
            platform.set_enrollment_result(result);

            let returned = controller
                .enroll_then_retry(
                    Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL,
                )
                .await;

            assert_eq!(returned, Some(result));
            assert_eq!(platform.enrollments().len(), 1);
            assert_eq!(platform.prompt_count(), 1, "{:?}", result);
        }
    }

    #[tokio::test]
    async fn retry_after_failed_enrollment_reports_not_enrolled_again() {
        let (platform, controller) = controller(Capability::NoneEnrolled, 30);
        let mut stream = controller.outcomes();
        platform.set_enrollment_result(EnrollmentResult::Dismissed);

        controller
            .enroll_then_retry(Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL)
            .await;

        assert_eq!(platform.prompt_count(), 0);
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::NotEnrolled)));
    }

    #[tokio::test]
    async fn button_prompts_once_per_press_when_available() {
        let (platform, controller) = controller(Capability::Success, 30);
        controller.authenticate().await;
        platform
            .last_callback()
            .expect("prompt was shown")
            .on_error(10, "Authentication canceled");

        controller.authenticate().await;
        assert_eq!(platform.prompt_count(), 2);
        assert!(platform.enrollments().is_empty());
    }

    #[tokio::test]
    async fn concurrent_presses_keep_one_attempt_in_flight() {
        let (platform, controller) = controller(Capability::Success, 30);
        let other = controller.clone();

        tokio::join!(controller.authenticate(), other.authenticate());
        assert_eq!(platform.prompt_count(), 1);

        // Still open after a failed match
        platform.last_callback().expect("prompt was shown").on_failed();
        controller.authenticate().await;
        assert_eq!(platform.prompt_count(), 1);

        platform.last_callback().expect("prompt was shown").on_succeeded();
        controller.authenticate().await;
        assert_eq!(platform.prompt_count(), 2);
    }

    #[tokio::test]
    async fn enrollment_screen_opens_once_for_overlapping_requests() {
        let (platform, controller) = controller(Capability::NoneEnrolled, 30);
        let other = controller.clone();
        let set = Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL;

        let (first, second) = tokio::join!(
            controller.enroll_then_retry(set),
            other.enroll_then_retry(set)
        );

        assert_eq!(platform.enrollments().len(), 1);
        assert!(first.is_some() != second.is_some());
        // Only the request that opened the screen retried
        assert_eq!(platform.queried_authenticators().len(), 1);
    }

    #[tokio::test]
    async fn button_is_ignored_while_enrolling() {
        let (platform, controller) = controller(Capability::NoneEnrolled, 30);
        let other = controller.clone();
        let set = Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL;

        // The press is polled after the enrollment request has claimed the screen
        tokio::join!(controller.enroll_then_retry(set), other.authenticate());

        assert_eq!(platform.enrollments().len(), 1);
        assert_eq!(platform.queried_authenticators().len(), 1);
    }
}
