use log::{info, warn};

/// Check fprintd service status.
pub fn check_fprintd_service() {
    match std::process::Command::new("systemctl")
        .args(["is-active", "fprintd"])
        .output()
    {
        Ok(output) => {
            let status_output = String::from_utf8_lossy(&output.stdout);
            let status = status_output.trim();
            if status == "active" {
                info!("fprintd service is running");
            } else {
                // fprintd is D-Bus activated, so "inactive" is normal until first use
                info!("fprintd service status: {}", status);
                info!("fprintd will be started on demand by D-Bus activation");
            }
        }
        Err(e) => {
            warn!("Cannot check fprintd service status: {}", e);
        }
    }
}

/// Log the platform configuration the application starts with.
pub fn log_platform_configuration(version: crate::auth::PlatformVersion) {
    let authenticators = crate::auth::authenticators::allowed_authenticators(version);
    info!("Platform version: {}", version);
    info!("Requested authenticators: {}", authenticators);
    if crate::auth::authenticators::supports_enrollment_link(version) {
        info!("Enrollment screen can be opened directly when no fingerprint is set");
    } else {
        info!("Enrollment screen link not supported on this platform version");
    }
}
