//! User Interface handling functionality.
//!
//! This module contains all UI-related components organized by functionality:
//! - `app`: Application setup and initialization
//! - `screen`: Outcome display and enrollment detour logic
//! - `dialogs`: Opens dialogs requested by the platform backend
//! - `prompt_dialog`: Authentication prompt window
//! - `enroll_dialog`: Enrollment window

pub mod app;
pub mod dialogs;
pub mod enroll_dialog;
pub mod prompt_dialog;
pub mod screen;

// Re-export commonly used items
pub use app::setup_application_ui;
