//! Logging setup
//!
//! Installs a global `tracing` subscriber from `LoggerConfig`. `RUST_LOG`
//! overrides the configured level when set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;
use crate::error::{Result, StoreError};

/// Map a 0..=5 (Panic..Debug) level to a filter
///
/// Panic and Fatal have no tracing counterpart and collapse into ERROR.
/// Out-of-range values fall back to INFO.
pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0..=2 => LevelFilter::ERROR,
        3 => LevelFilter::WARN,
        4 => LevelFilter::INFO,
        5 => LevelFilter::DEBUG,
        _ => LevelFilter::INFO,
    }
}

/// Pick the log destination
///
/// Returns stdout plus the I/O error when the log file cannot be opened.
pub fn make_writer(config: &LoggerConfig) -> (BoxMakeWriter, Option<std::io::Error>) {
    if config.to_file && !config.filename.as_os_str().is_empty() {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.filename)
        {
            Ok(file) => return (BoxMakeWriter::new(Mutex::new(file)), None),
            Err(e) => return (BoxMakeWriter::new(std::io::stdout), Some(e)),
        }
    }
    (BoxMakeWriter::new(std::io::stdout), None)
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(config.level).into()));
    let (writer, open_error) = make_writer(config);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| StoreError::Logging(e.to_string()))?;

    if let Some(e) = open_error {
        tracing::warn!(
            "Cannot open log file {}, logging to stdout: {}",
            config.filename.display(),
            e
        );
    }
    Ok(())
}
