//! Centralized configuration and constants for the application.

/// Color scheme for prompt and enrollment feedback.
pub struct ColorScheme {
    pub progress: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    pub success: &'static str,
    pub neutral: &'static str,
    pub process: &'static str,
}

/// Default color scheme for dialog feedback.
pub const COLORS: ColorScheme = ColorScheme {
    progress: "#a277ff", // Purple - successful scan/progress
    warning: "#ff6ac1",  // Pink - retry/adjustment needed
    error: "#ff4d6d",    // Red - failure/error
    success: "#a277ff",  // Purple - completion
    neutral: "#8a8f98",  // Gray - neutral/fallback
    process: "#5ea2ff",  // Blue - processing/neutral status
};

/// Application information constants.
pub mod app_info {
    pub const NAME: &str = "fprompt";
    pub const ID: &str = "xyz.xerolinux.fprompt";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const RESOURCE_PREFIX: &str = "/xyz/xerolinux/fprompt";
}

/// Fixed strings shown by the authentication prompt.
pub mod prompt {
    pub const TITLE: &str = "Sample prompt title";
    pub const DESCRIPTION: &str = "Sample prompt description";
    pub const NEGATIVE_BUTTON: &str = "Cancel";
    pub const CANCELED_MESSAGE: &str = "Authentication canceled";
    pub const LOCKOUT_MESSAGE: &str = "Too many attempts. Try again later.";

    /// Failed matches tolerated within one prompt before it locks out.
    pub const MAX_FAILED_ATTEMPTS: u32 = 5;
}

/// Display strings for each authentication outcome.
pub mod messages {
    pub const HARDWARE_UNAVAILABLE: &str = "Hardware unavailable";
    pub const HARDWARE_TEMPORARILY_UNAVAILABLE: &str = "Hardware temporarily unavailable";
    pub const NOT_ENROLLED: &str = "No biometric is set";
    pub const SUCCEEDED: &str = "Authentication succeeded";
    pub const FAILED: &str = "Authentication failed";
}

/// Get color scheme for UI feedback.
pub fn colors() -> &'static ColorScheme {
    &COLORS
}
