#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Collection of utilities for the wirebind CLI orchestrator.

use std::fs;
use std::path::{Path, PathBuf};

use config::Config;
use pipeline::GenerationReport;
use thiserror::Error;

/// Errors that can occur during CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generic error with a custom message.
    #[error("{0}")]
    Message(String),
    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Logging could not be set up.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// The pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Protocol description path
    pub input: Option<PathBuf>,
    /// Output directory
    pub output: Option<PathBuf>,
    /// Log level
    pub log_level: Option<String>,
}

/// Load the configuration and apply command-line overrides
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(input) = &overrides.input {
        config.input.path = input.clone();
    }
    if let Some(output) = &overrides.output {
        config.output.dir = output.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

/// Install the log subscriber described by `config`
pub fn init_logging(config: &Config) -> Result<()> {
    match &config.logging.file {
        Some(file) => logging::init_with_file(&config.logging.level, file)?,
        None => logging::init(&config.logging.level)?,
    };
    Ok(())
}

/// Run the pipeline for `config`
pub fn generate(config: &Config, keep_going: bool) -> Result<GenerationReport> {
    Ok(pipeline::run(config, keep_going)?)
}

/// Write the default configuration to `path`, or to [`Config::default_path`].
///
/// An existing file is never overwritten.
pub fn init_config(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    if path.exists() {
        return Err(CliError::Message(format!(
            "config file already exists at {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Config::default().save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_applies_overrides() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = init_config(Some(dir.path().join("config.toml"))).expect("init config");

        let overrides = Overrides {
            input: Some(PathBuf::from("randr.json")),
            output: None,
            log_level: Some("debug".to_string()),
        };
        let config = resolve_config(Some(&path), &overrides).expect("resolve config");
        assert_eq!(config.input.path, PathBuf::from("randr.json"));
        assert_eq!(config.output.dir, Config::default_output_dir());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");
        init_config(Some(path.clone())).expect("first init");
        assert!(matches!(init_config(Some(path)), Err(CliError::Message(_))));
    }
}
