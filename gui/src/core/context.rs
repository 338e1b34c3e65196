//! Shared context for the authentication screen.

use crate::platform::FprintdPlatform;
use crate::ui::screen::ScreenController;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Button, Label};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Main context: runtime, widgets, and the screen controller.
#[derive(Clone)]
pub struct ScreenContext {
    pub rt: Arc<Runtime>,
    pub ui: ScreenWidgets,
    pub controller: ScreenController<FprintdPlatform>,
}

/// Widgets of the main window.
#[derive(Clone)]
pub struct ScreenWidgets {
    pub window: ApplicationWindow,
    pub authenticate: Button,
    pub result: Label,
}

impl ScreenWidgets {
    /// Create screen widgets from individual widgets.
    pub fn new(window: ApplicationWindow, authenticate: Button, result: Label) -> Self {
        Self {
            window,
            authenticate,
            result,
        }
    }
}

impl ScreenContext {
    /// Create a new screen context from pre-assembled components.
    pub fn new(
        rt: Arc<Runtime>,
        ui: ScreenWidgets,
        controller: ScreenController<FprintdPlatform>,
    ) -> Self {
        Self { rt, ui, controller }
    }

    /// Show the latest outcome text under the button.
    pub fn show_result(&self, text: &str) {
        self.ui.result.set_label(text);
        self.ui.result.set_visible(true);
    }
}
