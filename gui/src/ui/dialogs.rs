//! Opens the dialogs the platform backend asks for.

use crate::platform::SurfaceRequest;
use crate::ui::{enroll_dialog, prompt_dialog};
use gtk4::glib;
use gtk4::ApplicationWindow;
use log::{info, warn};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// How often the main loop checks for dialog requests and updates.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Poll surface requests on the main loop for as long as the backend lives.
pub fn install_surface_host(parent: &ApplicationWindow, requests: Receiver<SurfaceRequest>) {
    let parent = parent.clone();

    glib::timeout_add_local(POLL_INTERVAL, move || loop {
        match requests.try_recv() {
            Ok(SurfaceRequest::Prompt {
                info,
                updates,
                actions,
            }) => {
                info!("Opening authentication prompt '{}'", info.title);
                prompt_dialog::show_prompt(&parent, &info, updates, actions);
            }
            Ok(SurfaceRequest::Enrollment {
                finger,
                updates,
                closed,
            }) => {
                info!("Opening enrollment window");
                enroll_dialog::show_enrollment(&parent, &finger, updates, closed);
            }
            Err(TryRecvError::Empty) => return glib::ControlFlow::Continue,
            Err(TryRecvError::Disconnected) => {
                warn!("Platform backend is gone, no more dialogs will open");
                return glib::ControlFlow::Break;
            }
        }
    });
}
