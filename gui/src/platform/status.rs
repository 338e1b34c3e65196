//! Interpretation of fprintd VerifyStatus and EnrollStatus results.

use crate::auth::platform::error_code;
use crate::config::{colors, prompt};

/// What a verify session does in response to one VerifyStatus signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStep {
    /// Fingerprint matched; the prompt closes.
    Succeeded,
    /// Fingerprint did not match; the prompt stays open.
    Failed { restart: bool },
    /// Scan problem the user can fix; only the prompt text changes.
    Hint { text: &'static str, restart: bool },
    /// The prompt closes with an error.
    Error { code: i32, message: String },
}

/// Tracks failed matches within one prompt.
#[derive(Debug, Default)]
pub struct VerifyAttempts {
    failures: u32,
}

impl VerifyAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Map one VerifyStatus signal to the next session step.
    pub fn on_status(&mut self, result: &str, done: bool) -> VerifyStep {
        match result {
            "verify-match" => VerifyStep::Succeeded,
            "verify-no-match" => {
                self.failures += 1;
                if self.failures >= prompt::MAX_FAILED_ATTEMPTS {
                    VerifyStep::Error {
                        code: error_code::LOCKOUT,
                        message: prompt::LOCKOUT_MESSAGE.to_string(),
                    }
                } else {
                    VerifyStep::Failed { restart: done }
                }
            }
            "verify-retry-scan" => VerifyStep::Hint {
                text: "Try again.",
                restart: done,
            },
            "verify-too-fast" => VerifyStep::Hint {
                text: "Finger moved too fast. Try again.",
                restart: done,
            },
            "verify-swipe-too-short" => VerifyStep::Hint {
                text: "Swipe too short. Try a longer swipe.",
                restart: done,
            },
            "verify-finger-not-centered" => VerifyStep::Hint {
                text: "Finger not centered. Try again.",
                restart: done,
            },
            "verify-remove-and-retry" => VerifyStep::Hint {
                text: "Lift your finger and try again.",
                restart: done,
            },
            "verify-disconnected" => VerifyStep::Error {
                code: error_code::HW_UNAVAILABLE,
                message: "Fingerprint sensor disconnected".to_string(),
            },
            "verify-unknown-error" => VerifyStep::Error {
                code: error_code::UNABLE_TO_PROCESS,
                message: "Unable to process fingerprint".to_string(),
            },
            other => VerifyStep::Error {
                code: error_code::UNABLE_TO_PROCESS,
                message: format!("Unexpected fingerprint status: {}", other),
            },
        }
    }
}

/// Instruction shown when the prompt opens, by sensor scan type.
pub fn touch_instruction(scan_type: &str) -> &'static str {
    match scan_type {
        "swipe" => "Swipe your finger across the sensor",
        _ => "Touch the fingerprint sensor",
    }
}

/// Markup shown in the prompt dialog for a step that keeps it open.
pub fn prompt_feedback(step: &VerifyStep, failures: u32) -> Option<String> {
    let c = colors();
    match step {
        VerifyStep::Failed { .. } => Some(format!(
            "<span foreground='{}'><b>Not recognized.</b> Try again ({} of {}).</span>",
            c.warning,
            failures,
            prompt::MAX_FAILED_ATTEMPTS
        )),
        VerifyStep::Hint { text, .. } => Some(format!(
            "<span foreground='{}'>{}</span>",
            c.process, text
        )),
        VerifyStep::Succeeded | VerifyStep::Error { .. } => None,
    }
}

/// Terminal state of an enrollment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollEnd {
    Completed,
    Failed,
}

/// Feedback for one EnrollStatus signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollFeedback {
    pub markup: String,
    pub end: Option<EnrollEnd>,
}

/// Counts captured stages and renders enrollment progress.
#[derive(Debug, Default)]
pub struct EnrollProgress {
    stage_count: usize,
}

impl EnrollProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Initial message before the first signal arrives.
    pub fn first_prompt(&self) -> String {
        format!(
            "<b><span foreground='{}'>🔍 Scan 1</span> - Place your finger firmly on the scanner…</b>",
            colors().progress
        )
    }

    pub fn on_status(&mut self, result: &str, done: bool) -> EnrollFeedback {
        let c = colors();
        let next = self.stage_count + 1;

        let (markup, mut end) = match result {
            "enroll-stage-passed" => {
                self.stage_count += 1;
                (
                    format!(
                        "<span foreground='{}'><b>✅ Scan {} captured.</b> Lift your finger, then place it again…</span>",
                        c.progress, self.stage_count
                    ),
                    None,
                )
            }
            "enroll-retry-scan" | "enroll-remove-and-retry" => (
                format!(
                    "<span foreground='{}'><b>⚠️  Retry scan {}.</b> Lift your finger completely, reposition, then place again…</span>",
                    c.warning, next
                ),
                None,
            ),
            "enroll-too-fast" => (
                format!(
                    "<span foreground='{}'><b>🐇 Too fast.</b> Hold your finger still a little longer (scan {}).</span>",
                    c.warning, next
                ),
                None,
            ),
            "enroll-swipe-too-short" => (
                format!(
                    "<span foreground='{}'><b>👆 Swipe too short.</b> Try a longer, smoother swipe (still on scan {}).</span>",
                    c.warning, next
                ),
                None,
            ),
            "enroll-finger-not-centered" => (
                format!(
                    "<span foreground='{}'><b>🎯 Not centered.</b> Re‑place finger centered &amp; flat (scan {}).</span>",
                    c.warning, next
                ),
                None,
            ),
            "enroll-duplicate" => (
                format!(
                    "<span foreground='{}'><b>🔄 Already enrolled!</b> This fingerprint is registered already.</span>",
                    c.warning
                ),
                Some(EnrollEnd::Failed),
            ),
            "enroll-data-full" => (
                format!(
                    "<span foreground='{}'><b>📊 Device storage full.</b> Remove a fingerprint and try again.</span>",
                    c.error
                ),
                Some(EnrollEnd::Failed),
            ),
            "enroll-disconnected" => (
                format!(
                    "<span foreground='{}'><b>🔌 Sensor disconnected.</b></span>",
                    c.error
                ),
                Some(EnrollEnd::Failed),
            ),
            "enroll-failed" | "enroll-unknown-error" => (
                format!(
                    "<span foreground='{}'><b>❌ Enrollment failed.</b> Close this window to continue.</span>",
                    c.error
                ),
                Some(EnrollEnd::Failed),
            ),
            "enroll-completed" => (
                format!(
                    "<span foreground='{}'><b>🎉 Enrollment complete!</b> Captured {} quality scans.</span>",
                    c.success, self.stage_count
                ),
                Some(EnrollEnd::Completed),
            ),
            other => (
                format!(
                    "<span foreground='{}'><b>📊 Status:</b> {} (scan {})</span>",
                    c.neutral,
                    other,
                    self.stage_count.max(1)
                ),
                None,
            ),
        };

        // fprintd ends the run on any status flagged done
        if done && end.is_none() {
            end = Some(EnrollEnd::Failed);
        }

        EnrollFeedback { markup, end }
    }
}
