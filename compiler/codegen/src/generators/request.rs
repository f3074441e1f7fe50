//! Request binding: the top-level generator of one protocol operation.
//!
//! A [`RequestBinding`] owns the operation's [`ParameterList`] and decides
//! every axis of its output: void or reply-bearing, checked or unchecked, free
//! function or method injected onto a host. Free functions are always
//! produced; host methods only when the owning namespace asks for injection.

use ir::{Namespace, Request, RequestKind};

use super::cookie::CookieBinding;
use super::parameter_list::ParameterList;
use super::resource::{Host, ResourceFragments};
use crate::templates::{
    blank_separated, ForwardDeclaration, InlineReplyMethod, InlineVoidMethod, Render,
    ReplyRequestFunction, VoidRequestFunction,
};
use crate::utils::{sanitize_cpp_identifier, symbol_base};
use crate::{CodegenError, Result};

/// C symbol of `request`
///
/// The regular symbol is `xcb_[prefix_]name`. The irregular one appends
/// `_checked` for void operations and `_unchecked` for reply-bearing ones.
pub fn c_name(namespace: &Namespace, request: &Request, regular: bool) -> String {
    let base = format!("{}{}", symbol_base(namespace.prefix()), request.name());
    match (regular, request.is_void()) {
        (true, _) => base,
        (false, true) => format!("{}_checked", base),
        (false, false) => format!("{}_unchecked", base),
    }
}

/// Methods of one operation injected into one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMethods {
    /// Host name (`connection` or a resource name)
    pub host: String,
    /// Rendered methods
    pub text: String,
}

/// Everything generated for one operation
#[derive(Debug)]
pub struct RequestOutput {
    /// Operation name
    pub operation: String,
    /// Owning namespace
    pub namespace: String,
    /// Forward declaration, for reply-bearing operations
    pub declaration: Option<String>,
    /// Free functions and classes
    pub free_functions: String,
    /// Injected methods, connection host first
    pub methods: Vec<HostMethods>,
    /// Resource hosts left without a method, with the reason
    ///
    /// The free functions and the other hosts' methods are still generated.
    pub host_failures: Vec<CodegenError>,
}

/// Generator of one operation
#[derive(Debug, Clone)]
pub struct RequestBinding<'a> {
    namespace: &'a Namespace,
    request: &'a Request,
    parameters: ParameterList,
    wrapped: bool,
    accessors: Vec<String>,
}

impl<'a> RequestBinding<'a> {
    /// Bind `request` within `namespace`
    pub fn new(namespace: &'a Namespace, request: &'a Request) -> Self {
        Self {
            namespace,
            request,
            parameters: request.parameters().iter().cloned().collect(),
            wrapped: false,
            accessors: Vec::new(),
        }
    }

    /// Enable the wrapped and iterator overloads. Calling it again has no effect.
    pub fn make_wrapped(&mut self) -> &mut Self {
        self.wrapped = true;
        self
    }

    /// Whether the wrapped and iterator overloads are enabled
    pub fn is_wrapped(&self) -> bool { self.wrapped }

    /// Operation name
    pub fn name(&self) -> &str { self.request.name() }

    /// Operation name as a C++ identifier
    pub fn identifier(&self) -> String { sanitize_cpp_identifier(self.request.name()) }

    /// Whether the operation has no reply
    pub fn is_void(&self) -> bool { self.request.is_void() }

    /// C symbol, see [`c_name`]
    pub fn c_name(&self, regular: bool) -> String { c_name(self.namespace, self.request, regular) }

    /// Parameters of the operation
    pub fn parameter_list(&self) -> &ParameterList { &self.parameters }

    /// See [`ParameterList::comma`]
    pub fn comma(&self) -> &'static str { self.parameters.comma() }

    /// See [`ParameterList::calls`]
    pub fn calls(&self, sort: bool) -> Vec<String> { self.parameters.calls(sort) }

    /// See [`ParameterList::protos`]
    pub fn protos(&self, sort: bool, defaults: bool) -> Result<Vec<String>> {
        self.parameters.protos(sort, defaults)
    }

    /// Forward declaration of the operation's class
    pub fn make_proto(&self) -> String { ForwardDeclaration { class: self.identifier() }.render() }

    /// Free functions and classes of the operation
    ///
    /// Reply-bearing operations also record their accessors for
    /// [`RequestBinding::make_accessors`].
    pub fn make_class(&mut self) -> Result<String> {
        let request = self.request;
        let cookie = CookieBinding::new(self.namespace, request, &self.parameters, self.wrapped);
        match request.kind() {
            RequestKind::Void => match cookie.void_functions()? {
                Some(text) => Ok(text),
                None => Ok(VoidRequestFunction {
                    name: self.identifier(),
                    checked_symbol: self.c_name(false),
                    symbol: self.c_name(true),
                }
                .render()),
            },
            RequestKind::Reply(reply) => {
                let classes = cookie.make_reply(reply)?;
                self.accessors = classes.accessors;
                Ok(format!(
                    "{}\n\n{}",
                    classes.text,
                    ReplyRequestFunction { name: self.identifier() }.render()
                ))
            }
        }
    }

    /// Accessors recorded by the last [`RequestBinding::make_class`], each wrapped in blank lines
    pub fn make_accessors(&self) -> String { blank_separated(&self.accessors) }

    /// Methods of the operation injected into `host`
    ///
    /// On a resource host the resource's name fragment is removed from the
    /// method name and the resource itself is passed as the first argument.
    pub fn make_object_class_inline(
        &self,
        host: Host<'_>,
        fragments: &ResourceFragments,
    ) -> Result<String> {
        let method = match host {
            Host::Connection => self.request.name().to_string(),
            Host::Resource(resource) => fragments.strip(self.request.name(), &resource.name)?,
        };
        let method = sanitize_cpp_identifier(&method);
        let namespace = sanitize_cpp_identifier(self.namespace.name());
        let text = if self.is_void() {
            InlineVoidMethod {
                request: self.identifier(),
                method,
                namespace,
                connection: host.connection_expr().to_string(),
                member: host.member().to_string(),
            }
            .render()
        } else {
            InlineReplyMethod {
                request: self.identifier(),
                method,
                namespace,
                connection: host.connection_expr().to_string(),
                member: host.member().to_string(),
            }
            .render()
        };
        Ok(text)
    }

    /// Generate everything for the operation
    pub fn generate(&mut self, fragments: &ResourceFragments) -> Result<RequestOutput> {
        let free_functions = self.make_class()?;
        let declaration = if self.is_void() { None } else { Some(self.make_proto()) };
        let mut methods = Vec::new();
        let mut host_failures = Vec::new();
        if self.namespace.inject_methods() {
            for host in fragments.hosts_for(self.request) {
                match self.make_object_class_inline(host, fragments) {
                    Ok(text) => methods.push(HostMethods { host: host.name().to_string(), text }),
                    Err(err @ CodegenError::UnknownResourceFragment { .. }) =>
                        host_failures.push(err),
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(RequestOutput {
            operation: self.request.name().to_string(),
            namespace: self.namespace.name().to_string(),
            declaration,
            free_functions,
            methods,
            host_failures,
        })
    }
}
