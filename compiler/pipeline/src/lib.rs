#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns a protocol description into C++ headers
//! by orchestrating code generation.
//!
//! ## Module Organization
//!
//! The pipeline is organized into focused modules:
//!
//! - `orchestration` - Main pipeline entry points (`run`, `load_protocol`)
//! - `generation_context` - Generation options
//! - `codegen_orchestration` - Per-operation generation with failure batching
//! - `emission` - Assembly and writing of headers and method includes

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the codegen pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
    /// Invalid or unreadable protocol description.
    #[error(transparent)]
    Ir(#[from] ir::IrError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// Error loading or saving configuration.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Error installing the log subscriber.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// I/O error while creating or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Some operations failed to generate.
    #[error("{count} operation(s) failed to generate")]
    GenerationFailed {
        /// Number of failed operations
        count: usize,
    },
}

impl From<String> for PipelineError {
    fn from(msg: String) -> Self { PipelineError::Message(msg) }
}

// Module declarations
pub mod codegen_orchestration;
pub mod emission;
pub mod generation_context;
pub mod orchestration;

// Re-export public API
pub use codegen_orchestration::{generate_protocol, GenerationReport};
pub use emission::emit;
pub use generation_context::Options;
pub use orchestration::{load_protocol, prepare_output_dir, run};
