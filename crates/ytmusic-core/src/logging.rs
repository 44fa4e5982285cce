//! Tracing setup for hosts embedding the extension.
//!
//! The library itself only emits `tracing` events. A host that has no
//! subscriber of its own can call [`init_logging`] once at startup:
//!
//! - console output, human readable, filtered by `RUST_LOG` or the
//!   configured level
//! - optional JSON file output with rotation, written off-thread
//!
//! Keep the returned guard alive; dropping it flushes and closes the file.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

const CRATE_TARGET: &str = "ytmusic_core";
const APP_DIR_NAME: &str = "ytmusic-extension";

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    /// One file per hour.
    Hourly,
    /// One file per day.
    Daily,
    /// A single file.
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

/// Logging options.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level of this crate's console events when `RUST_LOG` is unset.
    pub console_level: Level,
    /// Whether to color console output.
    pub console_ansi: bool,
    /// Directory for JSON log files; `None` disables file output.
    pub log_directory: Option<PathBuf>,
    /// File name prefix, e.g. `ytmusic` -> `ytmusic.2024-01-15`.
    pub log_file_prefix: String,
    /// Level of this crate's file events.
    pub file_level: Level,
    /// File rotation.
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Verbose console and file logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            console_level: Level::DEBUG,
            console_ansi: true,
            log_directory: Some(default_log_directory()),
            log_file_prefix: "ytmusic".to_string(),
            file_level: Level::TRACE,
            rotation: LogRotation::Hourly,
        }
    }

    /// Info-level console logging, debug-level daily files.
    #[must_use]
    pub fn production() -> Self {
        Self {
            console_level: Level::INFO,
            console_ansi: true,
            log_directory: Some(default_log_directory()),
            log_file_prefix: "ytmusic".to_string(),
            file_level: Level::DEBUG,
            rotation: LogRotation::Daily,
        }
    }

    /// Console only.
    #[must_use]
    pub const fn console_only(console_level: Level) -> Self {
        Self {
            console_level,
            console_ansi: true,
            log_directory: None,
            log_file_prefix: String::new(),
            file_level: Level::INFO,
            rotation: LogRotation::Never,
        }
    }

    /// Development settings in debug builds, production otherwise.
    #[must_use]
    pub fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// Set the log directory (`None` disables file output).
    #[must_use]
    pub fn with_log_directory(mut self, path: Option<PathBuf>) -> Self {
        self.log_directory = path;
        self
    }

    /// Set the console level.
    #[must_use]
    pub const fn with_console_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }
}

/// Default log directory under the platform's local data dir.
#[must_use]
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("logs")
}

fn crate_filter(level: Level) -> Result<EnvFilter> {
    EnvFilter::try_new(format!("warn,{CRATE_TARGET}={}", level.as_str().to_lowercase()))
        .map_err(|e| Error::Configuration(format!("Invalid log filter: {e}")))
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file output is enabled.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the log directory cannot be created
/// or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => crate_filter(config.console_level)?,
    };
    let console_layer = fmt::layer()
        .with_ansi(config.console_ansi)
        .with_target(true)
        .with_filter(console_filter);

    let (file_layer, guard) = match &config.log_directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Configuration(format!(
                    "Failed to create log directory {}: {e}",
                    dir.display()
                ))
            })?;
            let appender =
                RollingFileAppender::new(config.rotation.into(), dir, &config.log_file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(crate_filter(config.file_level)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Configuration(format!("Logging already initialized: {e}")))?;

    tracing::info!(
        "Logging initialized (file output: {})",
        config.log_directory.is_some()
    );
    Ok(guard)
}
