//! Authentication manager: wraps the platform prompt and relays its results.

use crate::auth::authenticators::allowed_authenticators;
use crate::auth::{
    AuthCallback, AuthOutcome, Authenticators, BiometricPlatform, Capability, OutcomePublisher,
    OutcomeStream, PlatformVersion, PromptInfo,
};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Checks availability, shows the platform prompt, and publishes outcomes.
pub struct AuthManager<P> {
    platform: Arc<P>,
    version: PlatformVersion,
    authenticators: Authenticators,
    outcomes: OutcomePublisher,
    in_flight: Arc<AtomicBool>,
}

impl<P: BiometricPlatform> AuthManager<P> {
    pub fn new(platform: Arc<P>, version: PlatformVersion) -> Self {
        let authenticators = allowed_authenticators(version);
        info!(
            "Authentication manager configured for platform version {} ({})",
            version, authenticators
        );

        Self {
            platform,
            version,
            authenticators,
            outcomes: OutcomePublisher::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    pub fn version(&self) -> PlatformVersion {
        self.version
    }

    /// Whether a trigger is between its capability check and a terminal outcome.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Subscribe to the outcome stream.
    pub fn outcomes(&self) -> OutcomeStream {
        self.outcomes.subscribe()
    }

    /// Query the platform; publish the matching outcome when it says no.
    pub async fn check_availability(&self) -> bool {
        info!(
            "Checking biometric availability for {}",
            self.authenticators
        );

        match self.platform.can_authenticate(self.authenticators).await {
            Capability::Success => {
                info!("Biometric authentication is available");
                true
            }
            Capability::NoHardware => {
                warn!("No biometric hardware present");
                self.outcomes.publish(AuthOutcome::HardwareUnavailable);
                false
            }
            Capability::HardwareUnavailable => {
                warn!("Biometric hardware is currently unavailable");
                self.outcomes
                    .publish(AuthOutcome::HardwareTemporarilyUnavailable);
                false
            }
            Capability::NoneEnrolled => {
                warn!("No biometric credential is enrolled");
                self.outcomes.publish(AuthOutcome::NotEnrolled);
                false
            }
            Capability::Other(reason) => {
                warn!("Biometric availability check failed: {}", reason);
                false
            }
        }
    }

    /// Show the platform prompt if authentication is available.
    ///
    /// Ignored while an earlier attempt is still in flight.
    pub async fn trigger_authentication(&self) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Authentication attempt already in flight, ignoring trigger");
            return;
        }

        if !self.check_availability().await {
            self.in_flight.store(false, Ordering::Release);
            return;
        }

        let prompt = PromptInfo::for_version(self.version);
        info!(
            "Showing authentication prompt '{}' (cancel button: {:?})",
            prompt.title, prompt.negative_button_text
        );
        let callback = AuthCallback::new(self.outcomes.clone(), self.in_flight.clone());
        self.platform.authenticate(prompt, callback).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::ScriptedPlatform;

    fn manager(platform: &Arc<ScriptedPlatform>, version: u32) -> AuthManager<ScriptedPlatform> {
        AuthManager::new(platform.clone(), PlatformVersion(version))
    }

    #[tokio::test]
    async fn unavailable_capabilities_publish_and_return_false() {
        let cases = [
            (Capability::NoHardware, AuthOutcome::HardwareUnavailable),
            (
                Capability::HardwareUnavailable,
                AuthOutcome::HardwareTemporarilyUnavailable,
            ),
            (Capability::NoneEnrolled, AuthOutcome::NotEnrolled),
        ];

        for (capability, expected) in cases {
            let platform = Arc::new(ScriptedPlatform::new(capability));
            let manager = manager(&platform, 30);
            let mut stream = manager.outcomes();

            assert!(!manager.check_availability().await);
            assert_eq!(stream.take_changed(), Ok(Some(expected)));
        }
    }

    #[tokio::test]
    async fn success_returns_true_without_publishing() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        let manager = manager(&platform, 30);
        let mut stream = manager.outcomes();

        assert!(manager.check_availability().await);
        assert_eq!(stream.take_changed(), Ok(None));
    }

    #[tokio::test]
    async fn other_capability_returns_false_silently() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Other(
            "security update required".to_string(),
        )));
        let manager = manager(&platform, 30);
        let mut stream = manager.outcomes();

        assert!(!manager.check_availability().await);
        assert_eq!(stream.take_changed(), Ok(None));
        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 0);
    }

    #[tokio::test]
    async fn failed_availability_never_prompts() {
        for capability in [
            Capability::NoHardware,
            Capability::HardwareUnavailable,
            Capability::NoneEnrolled,
        ] {
            let platform = Arc::new(ScriptedPlatform::new(capability));
            let manager = manager(&platform, 30);
            manager.trigger_authentication().await;
            assert_eq!(platform.prompt_count(), 0);
        }
    }

    #[tokio::test]
    async fn available_prompts_once_per_trigger() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        let manager = manager(&platform, 30);

        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 1);
        platform.last_callback().expect("prompt was shown").on_succeeded();

        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 2);
    }

    #[tokio::test]
    async fn trigger_is_ignored_while_prompt_is_open() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        let manager = manager(&platform, 30);

        manager.trigger_authentication().await;
        assert!(manager.is_in_flight());

        // A failed match keeps the prompt open
        platform.last_callback().expect("prompt was shown").on_failed();
        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 1);
        assert_eq!(platform.queried_authenticators().len(), 1);

        platform
            .last_callback()
            .expect("prompt was shown")
            .on_error(7, "Too many attempts");
        assert!(!manager.is_in_flight());

        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_triggers_show_one_prompt() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        let manager = manager(&platform, 30);

        tokio::join!(
            manager.trigger_authentication(),
            manager.trigger_authentication()
        );

        assert_eq!(platform.prompt_count(), 1);
        assert_eq!(platform.queried_authenticators().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_check_releases_the_attempt() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::NoneEnrolled));
        let manager = manager(&platform, 30);

        manager.trigger_authentication().await;
        assert!(!manager.is_in_flight());

        platform.set_capability(Capability::Success);
        manager.trigger_authentication().await;
        assert_eq!(platform.prompt_count(), 1);
    }

    #[tokio::test]
    async fn capability_query_uses_version_authenticators() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        manager(&platform, 29).check_availability().await;
        manager(&platform, 30).check_availability().await;

        assert_eq!(
            platform.queried_authenticators(),
            vec![
                Authenticators::BIOMETRIC_STRONG,
                Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL,
            ]
        );
    }

    #[tokio::test]
    async fn prompt_configuration_depends_on_version() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        manager(&platform, 28).trigger_authentication().await;
        manager(&platform, 31).trigger_authentication().await;

        let prompts = platform.prompts();
        assert_eq!(prompts[0].negative_button_text.as_deref(), Some("Cancel"));
        assert_eq!(prompts[1].negative_button_text, None);
        assert!(prompts[1]
            .allowed_authenticators
            .contains(Authenticators::DEVICE_CREDENTIAL));
    }

    #[tokio::test]
    async fn platform_callbacks_reach_the_stream() {
        let platform = Arc::new(ScriptedPlatform::new(Capability::Success));
        let manager = manager(&platform, 30);
        let mut stream = manager.outcomes();

        manager.trigger_authentication().await;
        let callback = platform.last_callback().expect("prompt was shown");

        callback.on_failed();
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Failed)));

        callback.on_error(7, "Too many attempts");
        assert_eq!(
            stream.take_changed(),
            Ok(Some(AuthOutcome::Error("Too many attempts".to_string())))
        );

        callback.on_succeeded();
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Succeeded)));
    }
}
