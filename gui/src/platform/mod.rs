//! Host biometric platform backed by fprintd.
//!
//! - `fprintd`: the `BiometricPlatform` implementation
//! - `status`: VerifyStatus / EnrollStatus interpretation
//! - `surface`: dialog requests from the runtime to the GTK thread

pub mod fprintd;
pub mod status;
pub mod surface;

pub use self::fprintd::FprintdPlatform;
pub use surface::{Surface, SurfaceRequest};
