#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! wirebind configuration
//!
//! This crate provides configuration management for the generator.
//! It handles loading, saving, and managing configuration files that specify:
//! - where the protocol description is read from
//! - where generated headers are written
//! - logging configuration
//! - code generation switches
//!
//! Configuration is stored in TOML format and can be loaded from files or created
//! with sensible defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Protocol description input
    #[serde(default)]
    pub input: InputConfig,
    /// Generated file output
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Code generation settings
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Protocol description input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the JSON protocol description
    pub path: PathBuf,
}

/// Generated file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one header and one method include per host per namespace
    pub dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log file path (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Overrides every namespace's method injection switch when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_methods: Option<bool>,
    /// Emit the wrapped and iterator overloads
    #[serde(default = "default_wrap")]
    pub wrap: bool,
    /// Resource name fragments that differ from the resource name, added to the built-in ones
    #[serde(default)]
    pub fragment_exceptions: BTreeMap<String, String>,
}

fn default_wrap() -> bool { true }

impl Default for InputConfig {
    fn default() -> Self { Self { path: PathBuf::from("resources/protocols/xproto.json") } }
}

impl Default for OutputConfig {
    fn default() -> Self { Self { dir: Config::default_output_dir() } }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            inject_methods: None,
            wrap: default_wrap(),
            fragment_exceptions: BTreeMap::from([("gcontext".to_string(), "gc".to_string())]),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `path` when given, which must exist; otherwise the file at
    /// [`Config::default_path`] when present; otherwise the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::from_file(default),
            _ => Ok(Self::default()),
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/wirebind/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("wirebind");
        Ok(config_dir.join("config.toml"))
    }

    /// Get the default output directory for generated headers
    pub fn default_output_dir() -> PathBuf { PathBuf::from("generated") }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            codegen: CodegenConfig::default(),
        }
    }
}
