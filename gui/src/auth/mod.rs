//! Authentication manager and the types it shares with the screen.
//!
//! - `outcome`: the closed set of authentication results
//! - `authenticators`: authenticator sets and platform-version rules
//! - `platform`: the trait the host biometric service implements
//! - `stream`: the single-slot outcome stream
//! - `manager`: availability check, prompt trigger, callback relay

pub mod authenticators;
pub mod manager;
pub mod outcome;
pub mod platform;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use authenticators::{Authenticators, PlatformVersion};
pub use manager::AuthManager;
pub use outcome::AuthOutcome;
pub use platform::{
    AuthCallback, BiometricPlatform, Capability, EnrollmentResult, PromptInfo,
};
pub use stream::{OutcomePublisher, OutcomeStream};
