//! Cookie and reply bindings.
//!
//! Every operation is rendered for both binding variants. The checked variant
//! validates against the live connection as soon as the request is sent; the
//! unchecked variant keeps the connection it was sent on and hands back a
//! cookie that is redeemed for the reply later.
//!
//! Naming is deliberately asymmetric. Reply-bearing operations are checked by
//! default (`op` / `op_unchecked`) while void operations are fired without
//! waiting by default (`op_checked` / `op`).

use std::fmt;

use ir::{Namespace, Reply, Request};

use super::field_accessor::FieldAccessorGenerator;
use super::parameter_list::ParameterList;
use super::request::c_name;
use crate::templates::{
    CheckedReplyConstructor, Render, ReplyClass, RequestClass, UncheckedReplyConstructor,
    VoidConstructor, VoidDefaultConstructor, VoidOperator, VoidRequestClassFunction,
};
use crate::utils::{leading_comma_join, sanitize_cpp_identifier};
use crate::Result;

/// Binding variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Errors surface when the request is made
    Checked,
    /// Errors surface when the cookie is redeemed
    Unchecked,
}

impl Tag {
    /// Both variants, in rendering order
    pub const ALL: [Tag; 2] = [Tag::Checked, Tag::Unchecked];

    /// C++ namespace of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Checked => "checked",
            Tag::Unchecked => "unchecked",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Arguments shared by every constructor or operator of one parameter view
#[derive(Debug, Clone)]
struct ViewArgs {
    template_clause: String,
    protos: String,
    initializers: String,
    calls: String,
}

/// Output of [`CookieBinding::make_reply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyClasses {
    /// Request classes, payload class and tagged reply class
    pub text: String,
    /// Accessors of the payload class, in field declaration order
    pub accessors: Vec<String>,
}

/// Request classes of one operation, for both binding variants
#[derive(Debug, Clone)]
pub struct CookieBinding<'a> {
    namespace: &'a Namespace,
    request: &'a Request,
    parameters: &'a ParameterList,
    class: String,
    wrap: bool,
}

impl<'a> CookieBinding<'a> {
    /// Create the binding; `wrap` enables the wrapped and iterator overloads
    pub fn new(
        namespace: &'a Namespace,
        request: &'a Request,
        parameters: &'a ParameterList,
        wrap: bool,
    ) -> Self {
        let class = sanitize_cpp_identifier(request.name());
        Self { namespace, request, parameters, class, wrap }
    }

    /// C symbol sending the request for `tag`
    pub fn symbol(&self, tag: Tag) -> String {
        // void: checked is the irregular form; reply: unchecked is
        let regular = (tag == Tag::Checked) != self.request.is_void();
        c_name(self.namespace, self.request, regular)
    }

    /// Field accessor generator wired to this operation's reply payload
    pub fn accessor_generator<'r>(&self, reply: &'r Reply) -> FieldAccessorGenerator<'r> {
        FieldAccessorGenerator::new(&self.class, &c_name(self.namespace, self.request, true), reply)
    }

    /// Void handling text, if this operation needs more than the generic free functions
    ///
    /// The namespace's override wins. Otherwise operations whose parameters
    /// need wrapping get request classes and free functions forwarding into them.
    pub fn void_functions(&self) -> Result<Option<String>> {
        if let Some(text) = self.namespace.void_override(self.request.name()) {
            return Ok(Some(text.to_string()));
        }
        if !(self.wrap && self.parameters.wants_wrap()) {
            return Ok(None);
        }
        let views = self.views()?;
        let mut out = String::new();
        for tag in Tag::ALL {
            let mut members = vec![VoidDefaultConstructor { class: self.class.clone() }.render()];
            members.extend(views.iter().map(|v| {
                VoidConstructor {
                    template_clause: v.template_clause.clone(),
                    class: self.class.clone(),
                    protos: v.protos.clone(),
                    initializers: v.initializers.clone(),
                    calls: v.calls.clone(),
                }
                .render()
            }));
            // views() always yields the raw view first
            let raw = &views[0];
            members.push(
                VoidOperator {
                    template_clause: raw.template_clause.clone(),
                    protos: raw.protos.clone(),
                    initializers: raw.initializers.clone(),
                    calls: raw.calls.clone(),
                }
                .render(),
            );
            let class = RequestClass {
                tag: tag.as_str().to_string(),
                class: self.class.clone(),
                signatures: vec![self.symbol(tag)],
                members,
                stores_connection: false,
            };
            out.push_str(&class.render());
            out.push('\n');
        }
        out.push_str(&VoidRequestClassFunction { name: self.class.clone() }.render());
        Ok(Some(out))
    }

    /// Request classes, payload class and tagged reply class of a reply-bearing operation
    pub fn make_reply(&self, reply: &Reply) -> Result<ReplyClasses> {
        let views = self.views()?;
        let reply_function = format!("{}_reply", c_name(self.namespace, self.request, true));
        let mut out = String::new();
        for tag in Tag::ALL {
            let members = views
                .iter()
                .map(|v| match tag {
                    Tag::Checked => CheckedReplyConstructor {
                        template_clause: v.template_clause.clone(),
                        class: self.class.clone(),
                        protos: v.protos.clone(),
                        initializers: v.initializers.clone(),
                        calls: v.calls.clone(),
                    }
                    .render(),
                    Tag::Unchecked => UncheckedReplyConstructor {
                        template_clause: v.template_clause.clone(),
                        class: self.class.clone(),
                        protos: v.protos.clone(),
                        initializers: v.initializers.clone(),
                        calls: v.calls.clone(),
                    }
                    .render(),
                })
                .collect();
            let class = RequestClass {
                tag: tag.as_str().to_string(),
                class: self.class.clone(),
                signatures: vec![reply_function.clone(), self.symbol(tag)],
                members,
                stores_connection: tag == Tag::Unchecked,
            };
            out.push_str(&class.render());
            out.push('\n');
        }

        let generator = self.accessor_generator(reply);
        let accessors = generator.accessors();
        out.push_str(&generator.payload_class(accessors.clone()));
        out.push('\n');
        let reply_class =
            ReplyClass { class: self.class.clone(), reply_type: generator.reply_type() };
        out.push_str(&reply_class.render());
        Ok(ReplyClasses { text: out, accessors })
    }

    /// Parameter views that get their own constructor: raw always, wrapped and
    /// iterator views when wrapping is enabled and they differ from the raw one
    fn views(&self) -> Result<Vec<ViewArgs>> {
        let p = self.parameters;
        let mut views = vec![ViewArgs {
            template_clause: String::new(),
            protos: leading_comma_join(&p.protos(false, true)?),
            initializers: String::new(),
            calls: leading_comma_join(&p.calls(false)),
        }];
        if !self.wrap {
            return Ok(views);
        }
        if !p.templates().is_empty() {
            views.push(ViewArgs {
                template_clause: p.template_clause("    ", "\n"),
                protos: leading_comma_join(&p.wrapped_protos(false, true)?),
                initializers: String::new(),
                calls: leading_comma_join(&p.wrapped_calls(false)),
            });
        }
        if !p.iterator_templates().is_empty() {
            views.push(ViewArgs {
                template_clause: p.iterator_template_clause("    ", "\n"),
                protos: leading_comma_join(&p.iterator_protos(false, true)?),
                initializers: p
                    .iterator_initializers()
                    .iter()
                    .map(|init| format!("\n      {}", init))
                    .collect(),
                calls: leading_comma_join(&p.iterator_calls(false)),
            });
        }
        Ok(views)
    }
}
