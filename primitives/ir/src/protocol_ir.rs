//! Wirebind protocol model
//!
//! Validated, immutable representation of the operations of a binary wire
//! protocol: namespaces, requests with their parameters, and reply payloads.
//! Every type here is built through a validating constructor or a `TryFrom`
//! conversion from the matching raw record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raw::{RawField, RawNamespace, RawProtocol, RawRequest};

/// Errors raised while validating a protocol description
#[derive(Debug, Error)]
pub enum IrError {
    /// A name that must be non-empty was empty
    #[error("{what} name is empty")]
    EmptyName {
        /// Kind of entity carrying the empty name
        what: &'static str,
    },
    /// A list field lacks the expression computing its length
    #[error("list field `{field}` has no length expression")]
    MissingLengthExpression {
        /// Field name
        field: String,
    },
    /// A scalar field carries a length expression
    #[error("scalar field `{field}` carries a length expression")]
    UnexpectedLengthExpression {
        /// Field name
        field: String,
    },
    /// A void operation also declares a reply
    #[error("void operation `{operation}` declares a reply")]
    VoidWithReply {
        /// Operation name
        operation: String,
    },
    /// Members of one wrapped group are not adjacent
    #[error("operation `{operation}`: wrapped group `{group}` is split by other parameters")]
    SplitWrappedGroup {
        /// Operation name
        operation: String,
        /// Group name
        group: String,
    },
    /// An iterator parameter names a length parameter that does not exist
    #[error("operation `{operation}`: iterator `{parameter}` refers to unknown length parameter `{length}`")]
    UnknownLengthParameter {
        /// Operation name
        operation: String,
        /// Iterator parameter name
        parameter: String,
        /// Referenced length parameter
        length: String,
    },
    /// An iterator parameter carries its own element count
    #[error("operation `{operation}`: iterator `{parameter}` is its own length parameter")]
    SelfLengthParameter {
        /// Operation name
        operation: String,
        /// Iterator parameter name
        parameter: String,
    },
    /// An iterator's length parameter is not a plain scalar
    #[error("operation `{operation}`: length `{length}` of iterator `{parameter}` is not a plain scalar")]
    LengthParameterRole {
        /// Operation name
        operation: String,
        /// Iterator parameter name
        parameter: String,
        /// Referenced length parameter
        length: String,
    },
    /// Two iterators take their element count from the same parameter
    #[error("operation `{operation}`: iterators `{first}` and `{second}` share length parameter `{length}`")]
    SharedLengthParameter {
        /// Operation name
        operation: String,
        /// First iterator
        first: String,
        /// Second iterator
        second: String,
        /// Shared length parameter
        length: String,
    },
    /// A generated declaration would reuse the name of another one
    #[error("operation `{operation}`: name `{name}` is declared twice in the generated signatures")]
    ConflictingName {
        /// Operation name
        operation: String,
        /// Name declared twice
        name: String,
    },
    /// A length expression reads a field the reply does not have
    #[error("operation `{operation}`: length of `{field}` refers to unknown field `{reference}`")]
    UnknownLengthField {
        /// Operation name
        operation: String,
        /// List field
        field: String,
        /// Referenced field
        reference: String,
    },
    /// Two parameters of one operation share a name
    #[error("operation `{operation}` has duplicate parameter `{parameter}`")]
    DuplicateParameter {
        /// Operation name
        operation: String,
        /// Duplicated parameter name
        parameter: String,
    },
    /// Two namespaces share a name
    #[error("duplicate namespace `{0}`")]
    DuplicateNamespace(String),
    /// An operation refers to a namespace that is not declared
    #[error("operation `{operation}` refers to unknown namespace `{namespace}`")]
    UnknownNamespace {
        /// Operation name
        operation: String,
        /// Referenced namespace
        namespace: String,
    },
    /// Underlying I/O error while reading a description
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed JSON description
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A protocol namespace: the core protocol or one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    prefix: String,
    inject_methods: bool,
    void_overrides: BTreeMap<String, String>,
}

impl Namespace {
    /// Create a namespace with the given display name and symbol prefix
    pub fn new(name: &str, prefix: &str) -> Result<Self, IrError> {
        if name.trim().is_empty() {
            return Err(IrError::EmptyName { what: "namespace" });
        }
        Ok(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            inject_methods: false,
            void_overrides: BTreeMap::new(),
        })
    }

    /// Request (or suppress) method injection for this namespace
    pub fn with_method_injection(mut self, inject: bool) -> Self {
        self.inject_methods = inject;
        self
    }

    /// Supply replacement text for the void operation `operation`
    pub fn with_void_override(mut self, operation: &str, text: &str) -> Self {
        self.void_overrides.insert(operation.to_string(), text.to_string());
        self
    }

    /// Display name, also the C++ sub-namespace
    pub fn name(&self) -> &str { &self.name }

    /// Symbol prefix (empty for the core protocol)
    pub fn prefix(&self) -> &str { &self.prefix }

    /// Whether method injection is requested
    pub fn inject_methods(&self) -> bool { self.inject_methods }

    /// Replacement text for a void operation, if the namespace supplies one
    pub fn void_override(&self, operation: &str) -> Option<&str> {
        self.void_overrides.get(operation).map(String::as_str)
    }
}

impl TryFrom<RawNamespace> for Namespace {
    type Error = IrError;

    fn try_from(raw: RawNamespace) -> Result<Self, Self::Error> {
        let mut ns =
            Namespace::new(&raw.name, &raw.prefix)?.with_method_injection(raw.inject_methods);
        ns.void_overrides = raw.void_overrides;
        Ok(ns)
    }
}

/// A resource class operations can be bound onto as methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource name (e.g. "window", "gcontext")
    pub name: String,
    /// C type identifying the resource (e.g. "xcb_window_t")
    #[serde(rename = "type")]
    pub ty: String,
}

impl Resource {
    /// Create a resource
    pub fn new(name: &str, ty: &str) -> Self { Self { name: name.to_string(), ty: ty.to_string() } }

    /// The resource classes of the X core protocol
    pub fn x_core_defaults() -> Vec<Resource> {
        [
            "atom", "colormap", "cursor", "drawable", "font", "fontable", "gcontext", "pixmap",
            "window",
        ]
        .iter()
        .map(|name| Resource::new(name, &format!("xcb_{}_t", name)))
        .collect()
    }
}

/// Role a parameter plays at call sites
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterRole {
    /// Plain value passed through unchanged
    #[default]
    Scalar,
    /// Member of the aggregate object argument `group`
    Wrapped {
        /// Name of the aggregate argument
        group: String,
    },
    /// Variable-length list expanded as a begin/end iterator pair
    Iterator {
        /// Name of the parameter carrying the element count
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<String>,
    },
}

/// One operation parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// C type (element type for iterator parameters)
    pub ty: String,
    /// Call-site role
    pub role: ParameterRole,
    /// Default value expression
    pub default: Option<String>,
}

impl Parameter {
    /// Create a parameter with an explicit role
    pub fn new(name: &str, ty: &str, role: ParameterRole) -> Self {
        Self { name: name.to_string(), ty: ty.to_string(), role, default: None }
    }

    /// Create a scalar parameter
    pub fn scalar(name: &str, ty: &str) -> Self { Self::new(name, ty, ParameterRole::Scalar) }

    /// Create a parameter belonging to the wrapped group `group`
    pub fn wrapped(name: &str, ty: &str, group: &str) -> Self {
        Self::new(name, ty, ParameterRole::Wrapped { group: group.to_string() })
    }

    /// Create an iterator parameter whose count travels in `length`
    pub fn iterator(name: &str, ty: &str, length: Option<&str>) -> Self {
        Self::new(name, ty, ParameterRole::Iterator { length: length.map(str::to_string) })
    }

    /// Attach a default value expression
    pub fn with_default(mut self, expr: &str) -> Self {
        self.default = Some(expr.to_string());
        self
    }

    /// Whether the parameter carries a default value
    pub fn has_default(&self) -> bool { self.default.is_some() }

    /// Wrapped group name, if any
    pub fn group(&self) -> Option<&str> {
        match &self.role {
            ParameterRole::Wrapped { group } => Some(group),
            _ => None,
        }
    }

    /// Whether the parameter is an iterator-driven list
    pub fn is_iterator(&self) -> bool { matches!(self.role, ParameterRole::Iterator { .. }) }
}

/// Binary operators allowed in length expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition
    #[serde(rename = "+")]
    Add,
    /// Subtraction
    #[serde(rename = "-")]
    Sub,
    /// Multiplication
    #[serde(rename = "*")]
    Mul,
    /// Division
    #[serde(rename = "/")]
    Div,
    /// Bitwise and
    #[serde(rename = "&")]
    And,
    /// Left shift
    #[serde(rename = "<<")]
    Shl,
    /// Right shift
    #[serde(rename = ">>")]
    Shr,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        };
        f.write_str(symbol)
    }
}

/// Reply header field holding the reply's length in 4-byte units
pub const REPLY_LENGTH_FIELD: &str = "length";

/// Expression computing the element count of a list field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthExpr {
    /// Value of another payload field
    FieldRef {
        /// Referenced field
        field: String,
    },
    /// Constant
    Value {
        /// Constant value
        value: u64,
    },
    /// Binary operation
    Op {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<LengthExpr>,
        /// Right operand
        rhs: Box<LengthExpr>,
    },
    /// Number of set bits of the operand
    Popcount {
        /// Operand
        popcount: Box<LengthExpr>,
    },
}

impl LengthExpr {
    /// Reference to another field
    pub fn field(name: &str) -> Self { LengthExpr::FieldRef { field: name.to_string() } }

    /// Constant value
    pub fn value(value: u64) -> Self { LengthExpr::Value { value } }

    /// Binary operation
    pub fn op(op: BinaryOp, lhs: LengthExpr, rhs: LengthExpr) -> Self {
        LengthExpr::Op { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Render the expression, mapping field references through `field`
    pub fn render(&self, field: &dyn Fn(&str) -> String) -> String {
        match self {
            LengthExpr::FieldRef { field: name } => field(name),
            LengthExpr::Value { value } => value.to_string(),
            LengthExpr::Op { op, lhs, rhs } =>
                format!("({} {} {})", lhs.render(field), op, rhs.render(field)),
            LengthExpr::Popcount { popcount } =>
                format!("xcb_popcount({})", popcount.render(field)),
        }
    }

    /// Names of all fields the expression reads, in order of appearance
    pub fn field_refs(&self) -> Vec<&str> {
        match self {
            LengthExpr::FieldRef { field } => vec![field.as_str()],
            LengthExpr::Value { .. } => Vec::new(),
            LengthExpr::Op { lhs, rhs, .. } => {
                let mut refs = lhs.field_refs();
                refs.extend(rhs.field_refs());
                refs
            }
            LengthExpr::Popcount { popcount } => popcount.field_refs(),
        }
    }
}

/// Shape of a reply field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single value
    Scalar,
    /// Variable-length list
    List {
        /// Element count
        length: LengthExpr,
    },
}

/// One reply payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// C type (element type for lists)
    pub ty: String,
    /// Field shape
    pub kind: FieldKind,
}

impl Field {
    /// Create a scalar field
    pub fn scalar(name: &str, ty: &str) -> Self {
        Self { name: name.to_string(), ty: ty.to_string(), kind: FieldKind::Scalar }
    }

    /// Create a list field of `ty` elements
    pub fn list(name: &str, ty: &str, length: LengthExpr) -> Self {
        Self { name: name.to_string(), ty: ty.to_string(), kind: FieldKind::List { length } }
    }

    /// Length expression of a list field
    pub fn length(&self) -> Option<&LengthExpr> {
        match &self.kind {
            FieldKind::List { length } => Some(length),
            FieldKind::Scalar => None,
        }
    }

    /// Whether the field is a list
    pub fn is_list(&self) -> bool { matches!(self.kind, FieldKind::List { .. }) }
}

impl TryFrom<RawField> for Field {
    type Error = IrError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(IrError::EmptyName { what: "field" });
        }
        match (raw.list, raw.length) {
            (true, Some(length)) => Ok(Field::list(&raw.name, &raw.ty, length)),
            (true, None) => Err(IrError::MissingLengthExpression { field: raw.name }),
            (false, None) => Ok(Field::scalar(&raw.name, &raw.ty)),
            (false, Some(_)) => Err(IrError::UnexpectedLengthExpression { field: raw.name }),
        }
    }
}

/// Reply payload of an operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    fields: Vec<Field>,
}

impl Reply {
    /// Create a reply from fields in declaration order
    pub fn new(fields: Vec<Field>) -> Self { Self { fields } }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] { &self.fields }
}

/// Whether an operation answers with a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// No reply
    Void,
    /// Reply with the given payload
    Reply(Reply),
}

/// One protocol operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    name: String,
    namespace: String,
    kind: RequestKind,
    parameters: Vec<Parameter>,
}

impl Request {
    /// Create and validate an operation
    pub fn new(
        name: &str,
        namespace: &str,
        kind: RequestKind,
        parameters: Vec<Parameter>,
    ) -> Result<Self, IrError> {
        if name.trim().is_empty() {
            return Err(IrError::EmptyName { what: "operation" });
        }
        validate_parameters(name, &parameters)?;
        if let RequestKind::Reply(reply) = &kind {
            validate_length_refs(name, reply)?;
        }
        Ok(Self { name: name.to_string(), namespace: namespace.to_string(), kind, parameters })
    }

    /// Operation name
    pub fn name(&self) -> &str { &self.name }

    /// Owning namespace name
    pub fn namespace(&self) -> &str { &self.namespace }

    /// Reply kind
    pub fn kind(&self) -> &RequestKind { &self.kind }

    /// Whether the operation has no reply
    pub fn is_void(&self) -> bool { matches!(self.kind, RequestKind::Void) }

    /// Reply payload, if any
    pub fn reply(&self) -> Option<&Reply> {
        match &self.kind {
            RequestKind::Reply(reply) => Some(reply),
            RequestKind::Void => None,
        }
    }

    /// Parameters in wire order
    pub fn parameters(&self) -> &[Parameter] { &self.parameters }

    /// First parameter, which decides resource-host binding
    pub fn first_parameter(&self) -> Option<&Parameter> { self.parameters.first() }
}

impl TryFrom<&RawRequest> for Request {
    type Error = IrError;

    fn try_from(raw: &RawRequest) -> Result<Self, Self::Error> {
        let kind = match (raw.is_void, &raw.reply) {
            (true, Some(_)) => return Err(IrError::VoidWithReply { operation: raw.name.clone() }),
            (true, None) => RequestKind::Void,
            (false, None) => RequestKind::Reply(Reply::default()),
            (false, Some(reply)) => {
                let fields = reply
                    .fields
                    .iter()
                    .cloned()
                    .map(Field::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                RequestKind::Reply(Reply::new(fields))
            }
        };
        let parameters = raw
            .parameters
            .iter()
            .map(|p| {
                let mut param = Parameter::new(&p.name, &p.ty, p.role.clone());
                param.default = p.default.clone();
                param
            })
            .collect();
        Request::new(&raw.name, &raw.namespace, kind, parameters)
    }
}

fn validate_parameters(operation: &str, parameters: &[Parameter]) -> Result<(), IrError> {
    let mut seen = BTreeSet::new();
    for p in parameters {
        if p.name.trim().is_empty() {
            return Err(IrError::EmptyName { what: "parameter" });
        }
        if !seen.insert(p.name.as_str()) {
            return Err(IrError::DuplicateParameter {
                operation: operation.to_string(),
                parameter: p.name.clone(),
            });
        }
    }

    // Groups must be contiguous: once a group is left it may not reappear
    let mut closed: BTreeSet<&str> = BTreeSet::new();
    let mut current: Option<&str> = None;
    for p in parameters {
        let group = p.group();
        if group != current {
            if let Some(previous) = current {
                closed.insert(previous);
            }
            if let Some(g) = group {
                if closed.contains(g) {
                    return Err(IrError::SplitWrappedGroup {
                        operation: operation.to_string(),
                        group: g.to_string(),
                    });
                }
            }
            current = group;
        }
    }

    let mut counted: BTreeMap<&str, &str> = BTreeMap::new();
    for p in parameters {
        let ParameterRole::Iterator { length: Some(length) } = &p.role else { continue };
        if length == &p.name {
            return Err(IrError::SelfLengthParameter {
                operation: operation.to_string(),
                parameter: p.name.clone(),
            });
        }
        let target = parameters.iter().find(|q| &q.name == length).ok_or_else(|| {
            IrError::UnknownLengthParameter {
                operation: operation.to_string(),
                parameter: p.name.clone(),
                length: length.clone(),
            }
        })?;
        if target.role != ParameterRole::Scalar {
            return Err(IrError::LengthParameterRole {
                operation: operation.to_string(),
                parameter: p.name.clone(),
                length: length.clone(),
            });
        }
        if let Some(first) = counted.insert(length.as_str(), p.name.as_str()) {
            return Err(IrError::SharedLengthParameter {
                operation: operation.to_string(),
                first: first.to_string(),
                second: p.name.clone(),
                length: length.clone(),
            });
        }
    }

    check_declared_names(operation, parameters)
}

/// Names the wrapped and iterator signatures declare must stay distinct
///
/// A wrapped group is declared under its own name, so it may only share it
/// with its own members. An iterator is declared as `<name>_begin` and
/// `<name>_end`, which may not shadow any other declaration.
fn check_declared_names(operation: &str, parameters: &[Parameter]) -> Result<(), IrError> {
    let conflict = |name: &str| IrError::ConflictingName {
        operation: operation.to_string(),
        name: name.to_string(),
    };

    let groups: BTreeSet<&str> = parameters.iter().filter_map(Parameter::group).collect();
    for group in &groups {
        if parameters.iter().any(|p| p.name == *group && p.group() != Some(*group)) {
            return Err(conflict(group));
        }
    }

    let mut declared: BTreeSet<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    declared.extend(groups.iter().copied());
    for p in parameters.iter().filter(|p| p.is_iterator()) {
        for bound in [format!("{}_begin", p.name), format!("{}_end", p.name)] {
            if declared.contains(bound.as_str()) {
                return Err(conflict(&bound));
            }
        }
    }
    Ok(())
}

/// Every field a list length reads must be declared in the reply
///
/// `length`, the reply header's word count, is always readable.
fn validate_length_refs(operation: &str, reply: &Reply) -> Result<(), IrError> {
    let known: BTreeSet<&str> = reply.fields().iter().map(|f| f.name.as_str()).collect();
    for field in reply.fields() {
        let Some(length) = field.length() else { continue };
        if let Some(reference) =
            length.field_refs().into_iter().find(|r| *r != REPLY_LENGTH_FIELD && !known.contains(r))
        {
            return Err(IrError::UnknownLengthField {
                operation: operation.to_string(),
                field: field.name.clone(),
                reference: reference.to_string(),
            });
        }
    }
    Ok(())
}

/// A loaded protocol description
///
/// Namespaces and resources are validated on load. Operations stay raw until
/// [`Protocol::validate_request`] is called for each, so that one malformed
/// operation does not prevent the others from being generated.
#[derive(Debug, Clone)]
pub struct Protocol {
    namespaces: Vec<Namespace>,
    resources: Vec<Resource>,
    requests: Vec<RawRequest>,
}

impl Protocol {
    /// Build a protocol from raw records
    pub fn from_raw(raw: RawProtocol) -> Result<Self, IrError> {
        let mut namespaces: Vec<Namespace> = Vec::with_capacity(raw.namespaces.len());
        for ns in raw.namespaces {
            let ns = Namespace::try_from(ns)?;
            if namespaces.iter().any(|n| n.name() == ns.name()) {
                return Err(IrError::DuplicateNamespace(ns.name().to_string()));
            }
            namespaces.push(ns);
        }
        let resources = raw.resources.unwrap_or_else(Resource::x_core_defaults);
        Ok(Self { namespaces, resources, requests: raw.requests })
    }

    /// Parse a protocol description from JSON text
    pub fn from_json(text: &str) -> Result<Self, IrError> {
        let raw: RawProtocol = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Load a protocol description from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, IrError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Declared namespaces
    pub fn namespaces(&self) -> &[Namespace] { &self.namespaces }

    /// Look a namespace up by name
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|n| n.name() == name)
    }

    /// Force method injection on or off for every namespace
    pub fn override_method_injection(&mut self, inject: bool) {
        self.namespaces = std::mem::take(&mut self.namespaces)
            .into_iter()
            .map(|ns| ns.with_method_injection(inject))
            .collect();
    }

    /// Resource classes
    pub fn resources(&self) -> &[Resource] { &self.resources }

    /// Raw operation records in description order
    pub fn requests(&self) -> &[RawRequest] { &self.requests }

    /// Validate one operation record against this protocol
    pub fn validate_request(&self, raw: &RawRequest) -> Result<Request, IrError> {
        if self.namespace(&raw.namespace).is_none() {
            return Err(IrError::UnknownNamespace {
                operation: raw.name.clone(),
                namespace: raw.namespace.clone(),
            });
        }
        Request::try_from(raw)
    }
}
