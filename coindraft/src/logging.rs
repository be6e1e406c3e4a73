//! Logging infrastructure for the drafting core
//!
//! Thin configuration layer over the `log` facade backed by `env_logger`.
//! Identifiers that could correlate wallet activity (addresses, transaction
//! ids) should go through [`sanitize_for_logging`] before being written at
//! info level or above.

use std::sync::Once;

use chrono::Local;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::io::Write as IoWrite;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level
    pub level: LogLevel,
    /// Whether to include timestamps in log messages
    pub include_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_timestamps: true,
        }
    }
}

static LOGGING_INIT: Once = Once::new();

/// Initialize the logging system with the given configuration
///
/// Safe to call multiple times; only the first call configures the logger.
pub fn init(config: &LogConfig) -> Result<(), String> {
    let mut result = Ok(());
    let include_timestamps = config.include_timestamps;
    let level = config.level;

    LOGGING_INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level.into());
        builder.format(move |buf, record| {
            if include_timestamps {
                write!(buf, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
            }
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        if let Err(e) = builder.try_init() {
            // Another logger (often a test harness) may already be in
            // place; that is not a failure of this call.
            if !e.to_string().contains("already been initialized") {
                result = Err(e.to_string());
            }
        }
    });

    result
}

/// Truncate a potentially identifying string for logging
///
/// Keeps the first and last four characters of long identifiers so log
/// lines stay matchable without reproducing the full value.
pub fn sanitize_for_logging(input: &str) -> String {
    let len = input.len();
    if len == 0 {
        return String::new();
    }
    if len <= 8 {
        return "*****".to_string();
    }
    format!("{}...{}", &input[0..4], &input[len - 4..])
}
