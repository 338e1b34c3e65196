//! Authenticator sets and the platform-version rules that select them.

use std::fmt;
use std::ops::BitOr;

/// Combination of verification methods accepted for a check or prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Authenticators(u32);

impl Authenticators {
    pub const BIOMETRIC_STRONG: Authenticators = Authenticators(0x000F);
    pub const DEVICE_CREDENTIAL: Authenticators = Authenticators(0x8000);

    pub const fn contains(self, other: Authenticators) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Authenticators {
    type Output = Authenticators;

    fn bitor(self, rhs: Self) -> Self::Output {
        Authenticators(self.0 | rhs.0)
    }
}

impl fmt::Display for Authenticators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Authenticators::BIOMETRIC_STRONG) {
            names.push("BIOMETRIC_STRONG");
        }
        if self.contains(Authenticators::DEVICE_CREDENTIAL) {
            names.push("DEVICE_CREDENTIAL");
        }
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

/// Platform API level the application runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlatformVersion(pub u32);

impl PlatformVersion {
    /// First version with combined authenticators and the direct enrollment link.
    pub const DIRECT_ENROLL: PlatformVersion = PlatformVersion(30);

    /// Version assumed when none is given on the command line.
    pub const CURRENT: PlatformVersion = PlatformVersion::DIRECT_ENROLL;
}

impl Default for PlatformVersion {
    fn default() -> Self {
        PlatformVersion::CURRENT
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticator set requested for capability checks and prompts.
pub fn allowed_authenticators(version: PlatformVersion) -> Authenticators {
    if version >= PlatformVersion::DIRECT_ENROLL {
        Authenticators::BIOMETRIC_STRONG | Authenticators::DEVICE_CREDENTIAL
    } else {
        Authenticators::BIOMETRIC_STRONG
    }
}

/// Whether the platform can open its enrollment screen directly.
pub fn supports_enrollment_link(version: PlatformVersion) -> bool {
    version >= PlatformVersion::DIRECT_ENROLL
}
