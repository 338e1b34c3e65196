//! The authentication prompt window.

use crate::auth::PromptInfo;
use crate::platform::surface::{DialogUpdate, PromptAction};
use crate::ui::app::{extract_widget, resource_path};
use crate::ui::dialogs::POLL_INTERVAL;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Builder, Button, Label, Window};
use log::info;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use tokio::sync::mpsc::UnboundedSender;

/// Show the prompt and relay user actions back to the verify session.
pub fn show_prompt(
    parent: &ApplicationWindow,
    info: &PromptInfo,
    updates: Receiver<DialogUpdate>,
    actions: UnboundedSender<PromptAction>,
) {
    let builder = Builder::from_resource(&resource_path("ui/prompt_dialog.ui"));

    let window: Window = extract_widget(&builder, "prompt_window");
    let title_label: Label = extract_widget(&builder, "title_label");
    let description_label: Label = extract_widget(&builder, "description_label");
    let status_label: Label = extract_widget(&builder, "status_label");
    let negative_button: Button = extract_widget(&builder, "negative_button");

    window.set_transient_for(Some(parent));
    window.set_title(Some(&info.title));
    title_label.set_label(&info.title);
    description_label.set_label(&info.description);

    // Set once the prompt is ending, so closing the window does not report a dismissal
    let finished = Rc::new(Cell::new(false));

    match &info.negative_button_text {
        Some(text) => {
            negative_button.set_label(text);
            negative_button.set_visible(true);

            let text = text.clone();
            let actions = actions.clone();
            let finished = finished.clone();
            let window = window.clone();
            negative_button.connect_clicked(move |_| {
                info!("User clicked '{}' on the prompt", text);
                if !finished.replace(true) {
                    let _ = actions.send(PromptAction::NegativeButton(text.clone()));
                }
                window.close();
            });
        }
        None => negative_button.set_visible(false),
    }

    {
        let finished = finished.clone();
        window.connect_close_request(move |_| {
            if !finished.replace(true) {
                info!("User closed the prompt window");
                let _ = actions.send(PromptAction::Dismissed);
            }
            glib::Propagation::Proceed
        });
    }

    {
        let window = window.clone();
        glib::timeout_add_local(POLL_INTERVAL, move || loop {
            match updates.try_recv() {
                Ok(DialogUpdate::Status(markup)) => {
                    status_label.set_markup(&markup);
                }
                Ok(DialogUpdate::Close) | Err(TryRecvError::Disconnected) => {
                    if !finished.replace(true) {
                        window.close();
                    }
                    return glib::ControlFlow::Break;
                }
                Err(TryRecvError::Empty) => return glib::ControlFlow::Continue,
            }
        });
    }

    window.present();
}
