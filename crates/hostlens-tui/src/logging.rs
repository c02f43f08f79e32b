//! Tracing setup for the dashboard binary
//!
//! The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use hostlens_config::LoggingConfig;
use tracing_subscriber::fmt;

use crate::error::{TuiError, TuiResult};

/// Map a configured level name to a tracing level
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Open `path` for appending, creating parent directories
pub fn open_log_file(path: &Path) -> TuiResult<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> TuiResult<()> {
    let level = if config.debug {
        tracing::Level::DEBUG.max(parse_level(&config.level))
    } else {
        parse_level(&config.level)
    };
    let file = open_log_file(&config.resolved_file())?;

    fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(config.debug)
        .with_thread_ids(config.debug)
        .with_file(config.debug)
        .with_line_number(config.debug)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| TuiError::Logging {
            message: e.to_string(),
        })
}
