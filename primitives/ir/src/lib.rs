#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Wirebind Intermediate Representation (IR)
//!
//! This crate defines the protocol description consumed by the binding generator:
//! the raw records deserialized from the description file and the validated,
//! closed set of types (namespaces, requests, parameters, replies, fields) that
//! generation operates on. Malformed input is rejected here, before any
//! generation logic runs.

pub mod protocol_ir;
pub mod raw;

// Re-export the main IR types for convenience
pub use protocol_ir::*;
pub use raw::*;
