//! The enrollment window opened when no fingerprint is set.

use crate::core::util;
use crate::platform::surface::DialogUpdate;
use crate::ui::app::{extract_widget, resource_path};
use crate::ui::dialogs::POLL_INTERVAL;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Builder, Button, Label, Window};
use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use tokio::sync::oneshot;

/// Show enrollment progress; `closed` fires when the user leaves the window.
pub fn show_enrollment(
    parent: &ApplicationWindow,
    finger: &str,
    updates: Receiver<DialogUpdate>,
    closed: oneshot::Sender<()>,
) {
    let builder = Builder::from_resource(&resource_path("ui/enroll_dialog.ui"));

    let window: Window = extract_widget(&builder, "enroll_window");
    let finger_label: Label = extract_widget(&builder, "finger_label");
    let status_label: Label = extract_widget(&builder, "status_label");
    let done_button: Button = extract_widget(&builder, "done_button");

    window.set_transient_for(Some(parent));
    if finger.is_empty() {
        finger_label.set_label("Fingerprint enrollment");
    } else {
        finger_label.set_label(&format!(
            "Enrolling: {}",
            util::display_finger_name(finger)
        ));
    }

    let closed = Rc::new(RefCell::new(Some(closed)));
    window.connect_close_request(move |_| {
        if let Some(tx) = closed.borrow_mut().take() {
            info!("Enrollment window closed, returning to the main screen");
            let _ = tx.send(());
        }
        glib::Propagation::Proceed
    });

    {
        let window = window.clone();
        done_button.connect_clicked(move |_| {
            window.close();
        });
    }

    let window_for_updates = window.clone();
    glib::timeout_add_local(POLL_INTERVAL, move || loop {
        match updates.try_recv() {
            Ok(DialogUpdate::Status(markup)) => {
                status_label.set_use_markup(true);
                status_label.set_markup(&markup);
            }
            Ok(DialogUpdate::Close) => {
                window_for_updates.close();
                return glib::ControlFlow::Break;
            }
            // Keep the window up so the last message stays readable
            Err(TryRecvError::Disconnected) => return glib::ControlFlow::Break,
            Err(TryRecvError::Empty) => return glib::ControlFlow::Continue,
        }
    });

    window.present();
}
