#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! C++ binding generation for X protocol operations.
//!
//! This crate turns validated protocol operations into the text of a
//! header-only C++ wrapper library over the XCB C bindings. Every operation
//! becomes a pair of free functions (checked and unchecked), request classes
//! and typed reply accessors where it has a reply, and optionally methods
//! injected onto the connection and resource classes.
//!
//! Loading protocol descriptions lives in `wirebind-ir`; driving a whole
//! protocol and writing files lives in `wirebind-pipeline`.

pub mod generators;

use std::fs;
use std::path::Path;

use ir::{IrError, Protocol, RawRequest};
use thiserror::Error;

pub use generators::{
    c_name, CookieBinding, FieldAccessorGenerator, Host, HostMethods, ParameterExt, ParameterList,
    ReplyClasses, RequestBinding, RequestOutput, ResourceFragments, Tag,
};

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A defaulted parameter is followed by a required one in declaration order.
    #[error("defaulted parameter `{parameter}` precedes required parameter `{following}`")]
    MalformedParameterOrder {
        /// First defaulted parameter
        parameter: String,
        /// Required parameter after it
        following: String,
    },
    /// A list field carries no length expression.
    #[error("list field `{field}` has no length expression")]
    MissingLengthExpression {
        /// Field name
        field: String,
    },
    /// The operation name does not embed the fragment of the resource it is injected into.
    #[error("operation `{operation}` does not embed fragment `{fragment}` of resource `{resource}`")]
    UnknownResourceFragment {
        /// Operation name
        operation: String,
        /// Resource name
        resource: String,
        /// Fragment searched for
        fragment: String,
    },
    /// Invalid protocol description.
    #[error(transparent)]
    Ir(IrError),
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<IrError> for CodegenError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::MissingLengthExpression { field } =>
                CodegenError::MissingLengthExpression { field },
            other => CodegenError::Ir(other),
        }
    }
}

impl From<String> for CodegenError {
    fn from(msg: String) -> Self { CodegenError::Message(msg) }
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// A failed operation together with the reason
#[derive(Debug, Error)]
#[error("operation `{operation}`: {error}")]
pub struct OperationFailure {
    /// Operation name
    pub operation: String,
    /// What went wrong
    #[source]
    pub error: CodegenError,
}

/// Validate and generate one operation of `protocol`
///
/// `wrap` enables the wrapped and iterator overloads.
pub fn generate_operation(
    protocol: &Protocol,
    raw: &RawRequest,
    fragments: &ResourceFragments,
    wrap: bool,
) -> Result<RequestOutput> {
    let request = protocol.validate_request(raw)?;
    let namespace = protocol.namespace(request.namespace()).ok_or_else(|| {
        CodegenError::Message(format!("unknown namespace `{}`", request.namespace()))
    })?;
    let mut binding = RequestBinding::new(namespace, &request);
    if wrap {
        binding.make_wrapped();
    }
    binding.generate(fragments)
}

/// Sub-crate: **`templates`**
///
/// Registry of C++ text templates and their typed argument records.
pub mod templates;

/// Sub-crate: **`utils`**
///
/// Utility functions for code generation.
pub mod utils;

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = src.lines().map(str::trim_end).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// Persist a list of generated source files to disk under the given output directory,
/// creating any necessary subdirectories.
pub fn write_generated<P: AsRef<Path>>(
    out_dir: P,
    files: &[(String, String)],
) -> std::io::Result<()> {
    fs::create_dir_all(&out_dir)?;
    for (name, src) in files {
        let path = out_dir.as_ref().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, clean_generated_source(src).as_bytes())?;
    }
    Ok(())
}
