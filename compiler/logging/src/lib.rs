#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the compiler.
//!
//! Installs a `tracing` subscriber writing to stderr or to a log file, and
//! keeps the module-tagged [`trace`] helper used across the workspace.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Accepted level names, most to least severe
pub const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Level name outside [`LEVELS`].
    #[error("unknown log level `{0}` (expected error, warn, info, debug or trace)")]
    UnknownLevel(String),
    /// The log file could not be opened.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenient result type for this crate.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Normalize a level name, rejecting unknown ones
pub fn parse_level(level: &str) -> Result<&'static str> {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .copied()
        .find(|name| *name == wanted)
        .ok_or_else(|| LoggingError::UnknownLevel(level.to_string()))
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    let level = parse_level(level)?;
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
}

/// Install the stderr subscriber at `level`.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept, so calling this more than once is harmless.
pub fn init(level: &str) -> Result<bool> {
    let filter = env_filter(level)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}

/// Install a subscriber appending to the file at `path` instead of stderr.
pub fn init_with_file(level: &str, path: &Path) -> Result<bool> {
    let filter = env_filter(level)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok())
}

/// Emits a trace event tagged with its module.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module = module, "{}", msg);
}
