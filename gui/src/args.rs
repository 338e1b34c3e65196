//! Command line options.

use crate::auth::PlatformVersion;
use clap::{Parser, ValueEnum};

/// Logging verbosity.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command line interface definition
#[derive(Debug, Parser)]
#[command(
    name = "fprompt",
    version,
    about = "Fingerprint authentication prompt sample backed by fprintd"
)]
pub struct Cli {
    /// Platform API level; 30 and above enable the combined authenticator set
    /// and the direct enrollment screen
    #[arg(long, default_value_t = PlatformVersion::CURRENT.0)]
    pub platform_version: u32,

    /// Logging verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn platform_version(&self) -> PlatformVersion {
        PlatformVersion(self.platform_version)
    }
}
