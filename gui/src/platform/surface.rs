//! Requests from the platform backend to the GTK thread.
//!
//! The backend runs on the tokio runtime and never touches widgets. It asks
//! the main loop to open a dialog and keeps talking to it through channels:
//! `std::sync::mpsc` towards GTK (polled by a glib source), tokio channels
//! back towards the backend.

use crate::auth::PromptInfo;
use log::warn;
use std::sync::mpsc;
use tokio::sync::{mpsc as async_mpsc, oneshot};

/// Update sent to an open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogUpdate {
    /// Replace the status line (Pango markup).
    Status(String),
    /// Close the dialog without reporting an action back.
    Close,
}

/// User action on the prompt dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// The app-supplied cancel button, carrying its label.
    NegativeButton(String),
    /// The dialog's own close control.
    Dismissed,
}

/// A dialog the backend wants on screen.
#[derive(Debug)]
pub enum SurfaceRequest {
    Prompt {
        info: PromptInfo,
        updates: mpsc::Receiver<DialogUpdate>,
        actions: async_mpsc::UnboundedSender<PromptAction>,
    },
    Enrollment {
        finger: String,
        updates: mpsc::Receiver<DialogUpdate>,
        closed: oneshot::Sender<()>,
    },
}

/// Sending half held by the backend.
#[derive(Debug, Clone)]
pub struct Surface {
    tx: mpsc::Sender<SurfaceRequest>,
}

/// Backend-side handle on an open prompt dialog.
#[derive(Debug)]
pub struct PromptHandle {
    pub updates: mpsc::Sender<DialogUpdate>,
    pub actions: async_mpsc::UnboundedReceiver<PromptAction>,
}

/// Backend-side handle on an open enrollment window.
#[derive(Debug)]
pub struct EnrollmentHandle {
    pub updates: mpsc::Sender<DialogUpdate>,
    pub closed: oneshot::Receiver<()>,
}

impl Surface {
    pub fn new() -> (Self, mpsc::Receiver<SurfaceRequest>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Ask the main loop to open the prompt dialog.
    pub fn open_prompt(&self, info: PromptInfo) -> PromptHandle {
        let (update_tx, update_rx) = mpsc::channel();
        let (action_tx, action_rx) = async_mpsc::unbounded_channel();

        let request = SurfaceRequest::Prompt {
            info,
            updates: update_rx,
            actions: action_tx,
        };
        if self.tx.send(request).is_err() {
            warn!("UI is gone, prompt dialog will not be shown");
        }

        PromptHandle {
            updates: update_tx,
            actions: action_rx,
        }
    }

    /// Ask the main loop to open the enrollment window.
    pub fn open_enrollment(&self, finger: String) -> EnrollmentHandle {
        let (update_tx, update_rx) = mpsc::channel();
        let (closed_tx, closed_rx) = oneshot::channel();

        let request = SurfaceRequest::Enrollment {
            finger,
            updates: update_rx,
            closed: closed_tx,
        };
        if self.tx.send(request).is_err() {
            warn!("UI is gone, enrollment window will not be shown");
        }

        EnrollmentHandle {
            updates: update_tx,
            closed: closed_rx,
        }
    }
}

impl PromptHandle {
    pub fn status(&self, markup: String) {
        let _ = self.updates.send(DialogUpdate::Status(markup));
    }

    pub fn close(&self) {
        let _ = self.updates.send(DialogUpdate::Close);
    }
}

impl EnrollmentHandle {
    pub fn status(&self, markup: String) {
        let _ = self.updates.send(DialogUpdate::Status(markup));
    }
}
