//! Logging configuration for db2i-bridge.
//!
//! Provides initialization helpers: stderr output for the CLI harness and
//! tests, or a log file for embedding hosts that own the terminal.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// Respects `RUST_LOG`; defaults to `info`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Initializes logging to a file.
///
/// Location: the platform state directory when available, otherwise the
/// config directory, otherwise the temp directory. Falls back to no logging
/// rather than failing the host.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth.
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("db2i-bridge").join("db2i-bridge.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("db2i-bridge").join("db2i-bridge.log");
    }

    std::env::temp_dir().join("db2i-bridge.log")
}
