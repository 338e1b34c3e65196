//! Application setup and initialization functionality.

use crate::auth::stream::StreamClosed;
use crate::auth::{AuthManager, AuthOutcome, PlatformVersion};
use crate::config::app_info;
use crate::core::{system, ScreenContext, ScreenWidgets};
use crate::platform::{FprintdPlatform, Surface};
use crate::ui::dialogs;
use crate::ui::screen::{Reaction, ScreenController};
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{gio, Application, ApplicationWindow, Builder, CssProvider};
use log::{error, info, warn};

use std::sync::Arc;
use std::time::Duration;

/// How often the main loop checks the outcome stream.
const OUTCOME_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Initialize and set up main application UI.
pub fn setup_application_ui(app: &Application, version: PlatformVersion) {
    info!("Initializing application components");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => Arc::new(rt),
        Err(e) => {
            error!("Failed to build Tokio runtime: {}", e);
            app.quit();
            return;
        }
    };
    info!("Tokio async runtime initialized");

    setup_resources_and_theme();

    let builder = Builder::from_resource(&resource_path("ui/main.ui"));
    let window = create_main_window(app, &builder);

    info!("Performing system environment checks");
    system::check_fprintd_service();
    system::log_platform_configuration(version);

    let (surface, requests) = Surface::new();
    let platform = Arc::new(FprintdPlatform::new(surface));
    let manager = Arc::new(AuthManager::new(platform, version));
    let controller = ScreenController::new(manager);

    let ui = ScreenWidgets::new(
        window.clone(),
        extract_widget(&builder, "authenticate_button"),
        extract_widget(&builder, "result_label"),
    );
    let ctx = ScreenContext::new(rt, ui, controller);

    dialogs::install_surface_host(&ctx.ui.window, requests);
    observe_outcomes(&ctx);
    setup_authenticate_button(&ctx);

    window.present();
    info!("{} startup complete", app_info::NAME);
}

/// Full resource path for a file in the bundle.
pub fn resource_path(relative: &str) -> String {
    format!("{}/{}", app_info::RESOURCE_PREFIX, relative)
}

/// Set up resources and theme.
fn setup_resources_and_theme() {
    gio::resources_register_include!("xyz.xerolinux.fprompt.gresource")
        .expect("Failed to register gresources");

    if let Some(display) = gtk4::gdk::Display::default() {
        info!("Setting up UI theme and styling");
        let css_provider = CssProvider::new();
        css_provider.load_from_resource(&resource_path("css/style.css"));
        gtk4::style_context_add_provider_for_display(
            &display,
            &css_provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        info!("UI theme and styling loaded successfully");
    } else {
        warn!("No default display found - UI theming may not work properly");
    }
}

/// Create main application window.
fn create_main_window(app: &Application, builder: &Builder) -> ApplicationWindow {
    let window: ApplicationWindow = extract_widget(builder, "app_window");

    window.set_application(Some(app));
    window.set_icon_name(Some("auth-fingerprint-symbolic"));

    window
}

/// Helper to extract widgets from builder with consistent error handling.
pub fn extract_widget<T: IsA<glib::Object>>(builder: &Builder, name: &str) -> T {
    builder
        .object(name)
        .unwrap_or_else(|| panic!("Failed to get {}", name))
}

/// Bind the "Authenticate" button to the controller.
fn setup_authenticate_button(ctx: &ScreenContext) {
    let ctx_clone = ctx.clone();
    ctx.ui.authenticate.connect_clicked(move |_| {
        info!("User clicked 'Authenticate' button");
        let controller = ctx_clone.controller.clone();
        ctx_clone.rt.spawn(async move {
            controller.authenticate().await;
        });
    });
}

/// Poll the outcome stream from the main loop and apply each new outcome.
fn observe_outcomes(ctx: &ScreenContext) {
    let mut stream = ctx.controller.outcomes();
    let ctx_clone = ctx.clone();

    glib::timeout_add_local(OUTCOME_POLL_INTERVAL, move || match stream.take_changed() {
        Ok(Some(outcome)) => {
            apply_outcome(&ctx_clone, &outcome);
            glib::ControlFlow::Continue
        }
        Ok(None) => glib::ControlFlow::Continue,
        Err(StreamClosed) => {
            warn!("Outcome stream closed, no further results will be shown");
            glib::ControlFlow::Break
        }
    });
}

fn apply_outcome(ctx: &ScreenContext, outcome: &AuthOutcome) {
    let reaction = ctx.controller.react(outcome);
    info!("Displaying outcome: {}", reaction.text());
    ctx.show_result(reaction.text());

    if let Reaction::ShowAndEnroll { authenticators, .. } = reaction {
        let controller = ctx.controller.clone();
        ctx.rt.spawn(async move {
            controller.enroll_then_retry(authenticators).await;
        });
    }
}
