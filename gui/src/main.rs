use clap::Parser;
use gtk4::prelude::*;
use gtk4::{glib, Application};
use log::info;

mod args;
mod auth;
mod config;
mod core;
mod platform;
mod ui;

use config::app_info;

fn main() -> glib::ExitCode {
    let cli = args::Cli::parse();

    // Initialize logger
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(cli.log_level.into())
        .init()
    {
        eprintln!("Failed to initialize logger: {}", e);
    }

    info!("Starting {} v{}", app_info::NAME, app_info::VERSION);
    info!("Application ID: {}", app_info::ID);

    let version = cli.platform_version();
    let app = Application::builder().application_id(app_info::ID).build();

    app.connect_activate(move |app| ui::setup_application_ui(app, version));

    // Options were consumed by clap; GTK only sees the program name
    let program = std::env::args().next().unwrap_or_else(|| app_info::NAME.to_string());
    app.run_with_args(&[program])
}
