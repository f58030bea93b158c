//! Tracing subscriber setup driven by [`Settings`]

use crate::error::{ConfigError, Result};
use crate::settings::Settings;
use monorepo_shared::LogLevel;
use tracing_subscriber::EnvFilter;

/// The `tracing` filter directive equivalent to a [`LogLevel`].
pub fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Critical => "error",
    }
}

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter comes from `settings.log_level`. Debug mode
/// adds source file and line numbers to each event.
///
/// # Errors
///
/// Returns [`ConfigError::Logging`] if a global subscriber is already installed.
pub fn init_tracing(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(settings.log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(settings.debug)
        .with_line_number(settings.debug)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
