//! fprintd-backed implementation of the biometric platform.

use crate::auth::platform::error_code;
use crate::auth::{
    AuthCallback, Authenticators, BiometricPlatform, Capability, EnrollmentResult, PromptInfo,
};
use crate::config::{colors, prompt};
use crate::core::device_manager::{DeviceError, DeviceManager};
use crate::core::fprintd::StatusStream;
use crate::core::util;
use crate::platform::status::{self, EnrollEnd, EnrollProgress, VerifyAttempts, VerifyStep};
use crate::platform::surface::{EnrollmentHandle, PromptAction, PromptHandle, Surface};
use futures_util::StreamExt;
use log::{error, info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Talks to fprintd on the system bus and shows dialogs through the UI surface.
#[derive(Debug, Clone)]
pub struct FprintdPlatform {
    surface: Surface,
    // Held from claim to release by every device session
    device_lock: Arc<Mutex<()>>,
}

/// Map a device failure seen during the capability query.
pub fn capability_for(err: &DeviceError) -> Capability {
    match err {
        DeviceError::ConnectionFailed(_) | DeviceError::NoDeviceAvailable => {
            Capability::NoHardware
        }
        DeviceError::DeviceBusy(_) => Capability::HardwareUnavailable,
        DeviceError::NoEnrolledPrints => Capability::NoneEnrolled,
        DeviceError::ClaimFailed(msg) | DeviceError::OperationFailed(msg) => {
            Capability::Other(msg.clone())
        }
    }
}

/// Map a device failure seen while opening the prompt to an error callback.
pub fn prompt_error_for(err: &DeviceError) -> (i32, String) {
    match err {
        DeviceError::ConnectionFailed(_) | DeviceError::NoDeviceAvailable => (
            error_code::HW_NOT_PRESENT,
            "No fingerprint sensor found".to_string(),
        ),
        DeviceError::DeviceBusy(_) => (
            error_code::HW_UNAVAILABLE,
            "Fingerprint sensor is in use".to_string(),
        ),
        DeviceError::NoEnrolledPrints => (
            error_code::NO_BIOMETRICS,
            "No fingerprints enrolled".to_string(),
        ),
        DeviceError::ClaimFailed(_) => (error_code::CANCELED, err.to_string()),
        DeviceError::OperationFailed(_) => (error_code::VENDOR, err.to_string()),
    }
}

impl FprintdPlatform {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            device_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl BiometricPlatform for FprintdPlatform {
    fn can_authenticate(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = Capability> + Send {
        let device_lock = self.device_lock.clone();
        async move {
            if authenticators.contains(Authenticators::DEVICE_CREDENTIAL) {
                info!("Device credential requested; fprintd verifies fingerprints only");
            }
            let _session = device_lock.lock().await;
            query_capability().await
        }
    }

    fn authenticate(
        &self,
        prompt: PromptInfo,
        callback: AuthCallback,
    ) -> impl Future<Output = ()> + Send {
        let surface = self.surface.clone();
        let device_lock = self.device_lock.clone();
        async move {
            let session = device_lock.lock_owned().await;
            let handle = surface.open_prompt(prompt);
            tokio::spawn(run_verify_session(handle, callback, session));
        }
    }

    fn launch_enrollment(
        &self,
        authenticators: Authenticators,
    ) -> impl Future<Output = EnrollmentResult> + Send {
        let surface = self.surface.clone();
        let device_lock = self.device_lock.clone();
        async move {
            info!("Opening enrollment screen for {}", authenticators);
            let _session = device_lock.lock().await;
            run_enrollment(surface).await
        }
    }
}

async fn query_capability() -> Capability {
    let manager = match DeviceManager::acquire().await {
        Ok(manager) => manager,
        Err(e) => {
            warn!("Capability check could not acquire device: {}", e);
            return capability_for(&e);
        }
    };

    let capability = match manager.enrolled_fingers().await {
        Ok(_) => Capability::Success,
        Err(e) => capability_for(&e),
    };
    manager.release().await;

    info!("Capability check result: {:?}", capability);
    capability
}

/// What the verify session does after one status or user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// Keep waiting with the prompt open.
    Continue,
    /// Stop and restart VerifyStart; the prompt stays open.
    Restart,
    /// Close the prompt and end the session.
    Close,
}

/// Report a verify step through the callback.
pub fn dispatch_step(step: &VerifyStep, callback: &AuthCallback) -> SessionControl {
    match step {
        VerifyStep::Succeeded => {
            callback.on_succeeded();
            SessionControl::Close
        }
        VerifyStep::Failed { restart } => {
            callback.on_failed();
            if *restart {
                SessionControl::Restart
            } else {
                SessionControl::Continue
            }
        }
        VerifyStep::Hint { restart, .. } => {
            if *restart {
                SessionControl::Restart
            } else {
                SessionControl::Continue
            }
        }
        VerifyStep::Error { code, message } => {
            callback.on_error(*code, message);
            SessionControl::Close
        }
    }
}

/// Report a user action on the prompt. Every action ends the session.
pub fn dispatch_action(action: Option<PromptAction>, callback: &AuthCallback) -> SessionControl {
    match action {
        Some(PromptAction::NegativeButton(label)) => {
            info!("User pressed '{}' on the prompt", label);
            callback.on_error(error_code::NEGATIVE_BUTTON, &label);
        }
        Some(PromptAction::Dismissed) | None => {
            info!("User dismissed the prompt");
            callback.on_error(error_code::USER_CANCELED, prompt::CANCELED_MESSAGE);
        }
    }
    SessionControl::Close
}

/// Drive one prompt: verify until a match, an error, or the user leaves.
async fn run_verify_session(
    mut handle: PromptHandle,
    callback: AuthCallback,
    _session: OwnedMutexGuard<()>,
) {
    let manager = match DeviceManager::acquire().await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Prompt could not acquire device: {}", e);
            handle.close();
            let (code, message) = prompt_error_for(&e);
            callback.on_error(code, &message);
            return;
        }
    };

    let mut events = match start_verify(&manager).await {
        Ok(events) => events,
        Err(e) => {
            handle.close();
            let (code, message) = prompt_error_for(&e);
            callback.on_error(code, &message);
            manager.release().await;
            return;
        }
    };

    let scan_type = sensor_scan_type(&manager).await;
    handle.status(format!(
        "<span foreground='{}'>{}</span>",
        colors().neutral,
        status::touch_instruction(&scan_type)
    ));

    let mut attempts = VerifyAttempts::new();
    loop {
        let control = tokio::select! {
            event = events.next() => match event {
                Some(event) => {
                    info!("Verify status: result='{}', done={}", event.result, event.done);
                    let step = attempts.on_status(&event.result, event.done);
                    if let Some(markup) = status::prompt_feedback(&step, attempts.failures()) {
                        handle.status(markup);
                    }
                    dispatch_step(&step, &callback)
                }
                None => {
                    warn!("VerifyStatus stream ended unexpectedly");
                    callback.on_error(error_code::CANCELED, prompt::CANCELED_MESSAGE);
                    SessionControl::Close
                }
            },
            action = handle.actions.recv() => dispatch_action(action, &callback),
        };

        match control {
            SessionControl::Continue => {}
            SessionControl::Restart => restart_verify(&manager).await,
            SessionControl::Close => {
                handle.close();
                break;
            }
        }
    }

    if let Ok(device) = manager.device() {
        if let Err(e) = device.verify_stop().await {
            info!("VerifyStop after prompt: {}", e);
        }
    }
    manager.release().await;
}

async fn start_verify(manager: &DeviceManager) -> Result<StatusStream, DeviceError> {
    let device = manager.device()?;
    let events = device
        .receive_verify_status()
        .await
        .map_err(|e| DeviceError::OperationFailed(e.to_string()))?;

    info!("Starting verification against any enrolled finger");
    device.verify_start("any").await.map_err(|e| {
        error!("Failed to start verification: {}", e);
        DeviceError::from_operation(&e)
    })?;

    Ok(events)
}

async fn sensor_scan_type(manager: &DeviceManager) -> String {
    let Ok(device) = manager.device() else {
        return String::new();
    };
    if let Ok(name) = device.name().await {
        info!("Using fingerprint sensor '{}'", name);
    }
    device.scan_type().await.unwrap_or_else(|e| {
        warn!("Could not read sensor scan type: {}", e);
        String::new()
    })
}

async fn restart_verify(manager: &DeviceManager) {
    let Ok(device) = manager.device() else {
        return;
    };
    if let Err(e) = device.verify_stop().await {
        warn!("Failed to stop verification before retry: {}", e);
    }
    if let Err(e) = device.verify_start("any").await {
        warn!("Failed to restart verification: {}", e);
    }
}

/// Run the enrollment window until the user closes it.
async fn run_enrollment(surface: Surface) -> EnrollmentResult {
    let manager = match DeviceManager::acquire().await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Enrollment could not acquire device: {}", e);
            let handle = surface.open_enrollment(String::new());
            handle.status(format!(
                "<span foreground='{}'>{}</span>",
                colors().error,
                e
            ));
            let _ = handle.closed.await;
            return EnrollmentResult::Failed;
        }
    };

    let enrolled = match manager.enrolled_fingers().await {
        Ok(list) => list,
        Err(DeviceError::NoEnrolledPrints) => Vec::new(),
        Err(e) => {
            warn!("Could not list enrolled fingers, assuming none: {}", e);
            Vec::new()
        }
    };

    let Some(finger) = util::next_finger_to_enroll(&enrolled) else {
        warn!("Every finger is already enrolled");
        let handle = surface.open_enrollment(String::new());
        handle.status(format!(
            "<span foreground='{}'>All fingers are already enrolled.</span>",
            colors().neutral
        ));
        let _ = handle.closed.await;
        manager.release().await;
        return EnrollmentResult::Failed;
    };

    info!("Enrolling finger '{}'", finger);
    let handle = surface.open_enrollment(finger.to_string());
    let result = drive_enrollment(&manager, finger, handle).await;

    if let Ok(device) = manager.device() {
        if let Err(e) = device.enroll_stop().await {
            info!("EnrollStop after enrollment: {}", e);
        }
    }
    manager.release().await;

    info!("Enrollment screen returned: {:?}", result);
    result
}

async fn drive_enrollment(
    manager: &DeviceManager,
    finger: &str,
    mut handle: EnrollmentHandle,
) -> EnrollmentResult {
    let mut progress = EnrollProgress::new();

    let started = async {
        let device = manager.device()?;
        let events = device
            .receive_enroll_status()
            .await
            .map_err(|e| DeviceError::OperationFailed(e.to_string()))?;
        device
            .enroll_start(finger)
            .await
            .map_err(|e| DeviceError::from_operation(&e))?;
        Ok::<_, DeviceError>(events)
    }
    .await;

    let mut events = match started {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to start enrollment for '{}': {}", finger, e);
            handle.status(format!(
                "<span foreground='{}'>Could not start enrollment: {}</span>",
                colors().error,
                e
            ));
            let _ = (&mut handle.closed).await;
            return EnrollmentResult::Failed;
        }
    };

    handle.status(progress.first_prompt());

    let mut end: Option<EnrollEnd> = None;
    loop {
        tokio::select! {
            event = events.next(), if end.is_none() => {
                let Some(event) = event else {
                    warn!("EnrollStatus stream ended unexpectedly");
                    end = Some(EnrollEnd::Failed);
                    continue;
                };
                info!("Enrollment status update: result='{}', done={}", event.result, event.done);
                let feedback = progress.on_status(&event.result, event.done);
                handle.status(feedback.markup);
                if feedback.end.is_some() {
                    info!(
                        "Enrollment finished after {} stage(s): {:?}",
                        progress.stage_count(),
                        feedback.end
                    );
                    end = feedback.end;
                }
            }
            _ = &mut handle.closed => {
                break;
            }
        }
    }

    match end {
        Some(EnrollEnd::Completed) => EnrollmentResult::Completed,
        Some(EnrollEnd::Failed) => EnrollmentResult::Failed,
        None => EnrollmentResult::Dismissed,
    }
}
