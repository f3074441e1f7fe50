//! Raw protocol description records
//!
//! These mirror the JSON produced by the protocol parser one to one. They carry
//! no invariants; convert them into the validated types of [`crate::protocol_ir`]
//! before generating anything from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::protocol_ir::{LengthExpr, ParameterRole, Resource};

/// A whole protocol description as written by the parser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProtocol {
    /// Namespaces (the core protocol plus extensions)
    #[serde(default)]
    pub namespaces: Vec<RawNamespace>,
    /// Resource classes operations can be bound onto; `None` selects the X core set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    /// One record per protocol operation, in description order
    #[serde(default)]
    pub requests: Vec<RawRequest>,
}

/// Namespace record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNamespace {
    /// Display name, also used as the C++ sub-namespace (e.g. "x", "randr")
    pub name: String,
    /// Symbol prefix; empty for the core protocol
    #[serde(default)]
    pub prefix: String,
    /// Whether operations should also be injected as methods onto host types
    #[serde(default)]
    pub inject_methods: bool,
    /// Replacement text for void operations, keyed by operation name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub void_overrides: BTreeMap<String, String>,
}

/// Operation record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRequest {
    /// Operation name in snake_case (e.g. "query_tree")
    pub name: String,
    /// Name of the owning namespace
    pub namespace: String,
    /// Whether the operation has no reply
    #[serde(rename = "void", default)]
    pub is_void: bool,
    /// Parameters in wire order
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    /// Reply payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<RawReply>,
}

/// Parameter record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParameter {
    /// Parameter name
    pub name: String,
    /// C type of the parameter (element type for iterator parameters)
    #[serde(rename = "type")]
    pub ty: String,
    /// Role of the parameter
    #[serde(default)]
    pub role: ParameterRole,
    /// Default value expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Reply record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReply {
    /// Payload fields in declaration order
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// Reply field record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawField {
    /// Field name
    pub name: String,
    /// C type of the field (element type for lists)
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the field is a variable-length list
    #[serde(default)]
    pub list: bool,
    /// Length expression; required for lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthExpr>,
}
