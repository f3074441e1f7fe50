//! Template engine.
//!
//! A fixed registry of named C++ text templates. Each [`Template`] identifier is
//! bound to one argument record implementing [`Render`]; arguments are named
//! struct fields rather than positional substitutions, so a record can only be
//! rendered into the template it belongs to. Templates know nothing about
//! protocols: every decision about what to pass is made by the generators.

use std::fmt;

/// Identifiers of every template in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Free functions of a void operation calling the C symbols directly
    VoidRequestFunction,
    /// Free functions of a void operation forwarding to its request classes
    VoidRequestClassFunction,
    /// Free functions of a reply-bearing operation
    ReplyRequestFunction,
    /// Void operation injected as methods onto a host type
    InlineVoidMethod,
    /// Reply-bearing operation injected as methods onto a host type
    InlineReplyMethod,
    /// Checked or unchecked request class
    RequestClass,
    /// Default constructor of a void request class
    VoidDefaultConstructor,
    /// Sending constructor of a void request class
    VoidConstructor,
    /// Call operator of a void request class
    VoidOperator,
    /// Constructor of a checked reply request class
    CheckedReplyConstructor,
    /// Constructor of an unchecked reply request class
    UncheckedReplyConstructor,
    /// Reply payload class carrying the field accessors
    ReplyPayloadClass,
    /// Tagged reply template joining the payload with its request classes
    ReplyClass,
    /// Accessor of a scalar reply field
    ScalarAccessor,
    /// Parameterized accessor of a list reply field
    ListAccessor,
    /// Specialization of a list accessor for the declared element type
    ListAccessorSpecialization,
    /// Forward declaration of a class
    ForwardDeclaration,
}

impl Template {
    /// Every registered template
    pub const ALL: [Template; 17] = [
        Template::VoidRequestFunction,
        Template::VoidRequestClassFunction,
        Template::ReplyRequestFunction,
        Template::InlineVoidMethod,
        Template::InlineReplyMethod,
        Template::RequestClass,
        Template::VoidDefaultConstructor,
        Template::VoidConstructor,
        Template::VoidOperator,
        Template::CheckedReplyConstructor,
        Template::UncheckedReplyConstructor,
        Template::ReplyPayloadClass,
        Template::ReplyClass,
        Template::ScalarAccessor,
        Template::ListAccessor,
        Template::ListAccessorSpecialization,
        Template::ForwardDeclaration,
    ];

    /// Registry name of the template
    pub fn name(&self) -> &'static str {
        match self {
            Template::VoidRequestFunction => "void_request_function",
            Template::VoidRequestClassFunction => "void_request_class_function",
            Template::ReplyRequestFunction => "reply_request_function",
            Template::InlineVoidMethod => "inline_void_class",
            Template::InlineReplyMethod => "inline_reply_class",
            Template::RequestClass => "request_class",
            Template::VoidDefaultConstructor => "void_default_constructor",
            Template::VoidConstructor => "void_constructor",
            Template::VoidOperator => "void_operator",
            Template::CheckedReplyConstructor => "checked_reply_constructor",
            Template::UncheckedReplyConstructor => "unchecked_reply_constructor",
            Template::ReplyPayloadClass => "reply_payload_class",
            Template::ReplyClass => "reply_class",
            Template::ScalarAccessor => "scalar_accessor",
            Template::ListAccessor => "list_accessor",
            Template::ListAccessorSpecialization => "list_accessor_specialization",
            Template::ForwardDeclaration => "forward_declaration",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// An argument record bound to exactly one template
pub trait Render {
    /// The template this record fills
    const TEMPLATE: Template;

    /// Render the template with this record's arguments
    fn render(&self) -> String;
}

/// Wrap each item in blank lines, the layout used for member lists
pub fn blank_separated(items: &[String]) -> String {
    items.iter().map(|item| format!("\n{}\n", item)).collect()
}

/// Arguments of [`Template::VoidRequestFunction`]
#[derive(Debug, Clone)]
pub struct VoidRequestFunction {
    /// Operation identifier
    pub name: String,
    /// C symbol of the checked form
    pub checked_symbol: String,
    /// C symbol of the unchecked form
    pub symbol: String,
}

impl Render for VoidRequestFunction {
    const TEMPLATE: Template = Template::VoidRequestFunction;

    fn render(&self) -> String {
        format!(
            r#"template<typename Connection, typename ... Parameter>
void
{name}_checked(Connection && c, Parameter && ... parameter)
{{
  xpp::generic::check(std::forward<Connection>(c),
                      {checked_symbol}(std::forward<Connection>(c),
                          std::forward<Parameter>(parameter) ...));
}}

template<typename Connection, typename ... Parameter>
void
{name}(Connection && c, Parameter && ... parameter)
{{
  {symbol}(std::forward<Connection>(c),
      std::forward<Parameter>(parameter) ...);
}}
"#,
            name = self.name,
            checked_symbol = self.checked_symbol,
            symbol = self.symbol,
        )
    }
}

/// Arguments of [`Template::VoidRequestClassFunction`]
#[derive(Debug, Clone)]
pub struct VoidRequestClassFunction {
    /// Operation identifier, also the request class name
    pub name: String,
}

impl Render for VoidRequestClassFunction {
    const TEMPLATE: Template = Template::VoidRequestClassFunction;

    fn render(&self) -> String {
        format!(
            r#"template<typename Connection, typename ... Parameter>
void
{name}_checked(Connection && c, Parameter && ... parameter)
{{
  checked::request::{name}(std::forward<Connection>(c),
                           std::forward<Parameter>(parameter) ...);
}}

template<typename Connection, typename ... Parameter>
void
{name}(Connection && c, Parameter && ... parameter)
{{
  unchecked::request::{name}(std::forward<Connection>(c),
                             std::forward<Parameter>(parameter) ...);
}}
"#,
            name = self.name,
        )
    }
}

/// Arguments of [`Template::ReplyRequestFunction`]
#[derive(Debug, Clone)]
pub struct ReplyRequestFunction {
    /// Operation identifier, also the reply class name
    pub name: String,
}

impl Render for ReplyRequestFunction {
    const TEMPLATE: Template = Template::ReplyRequestFunction;

    fn render(&self) -> String {
        format!(
            r#"template<typename Connection, typename ... Parameter>
reply::{name}<Connection, xpp::generic::checked_tag>
{name}(Connection && c, Parameter && ... parameter)
{{
  return reply::{name}<Connection, xpp::generic::checked_tag>(
      std::forward<Connection>(c), std::forward<Parameter>(parameter) ...);
}}

template<typename Connection, typename ... Parameter>
reply::{name}<Connection, xpp::generic::unchecked_tag>
{name}_unchecked(Connection && c, Parameter && ... parameter)
{{
  return reply::{name}<Connection, xpp::generic::unchecked_tag>(
      std::forward<Connection>(c), std::forward<Parameter>(parameter) ...);
}}
"#,
            name = self.name,
        )
    }
}

/// Arguments of [`Template::InlineVoidMethod`]
#[derive(Debug, Clone)]
pub struct InlineVoidMethod {
    /// Operation identifier of the free functions called
    pub request: String,
    /// Method name on the host
    pub method: String,
    /// C++ sub-namespace of the free functions
    pub namespace: String,
    /// Expression yielding the host's connection
    pub connection: String,
    /// Leading argument contributed by the host itself (empty or `*this, `)
    pub member: String,
}

impl Render for InlineVoidMethod {
    const TEMPLATE: Template = Template::InlineVoidMethod;

    fn render(&self) -> String {
        format!(
            r#"    template<typename ... Parameter>
    void
    {method}_checked(Parameter && ... parameter) const
    {{
      xpp::{namespace}::{request}_checked({connection},
          {member}std::forward<Parameter>(parameter) ...);
    }}

    template<typename ... Parameter>
    void
    {method}(Parameter && ... parameter) const
    {{
      xpp::{namespace}::{request}({connection},
          {member}std::forward<Parameter>(parameter) ...);
    }}
"#,
            request = self.request,
            method = self.method,
            namespace = self.namespace,
            connection = self.connection,
            member = self.member,
        )
    }
}

/// Arguments of [`Template::InlineReplyMethod`]
#[derive(Debug, Clone)]
pub struct InlineReplyMethod {
    /// Operation identifier of the free functions called
    pub request: String,
    /// Method name on the host
    pub method: String,
    /// C++ sub-namespace of the free functions
    pub namespace: String,
    /// Expression yielding the host's connection
    pub connection: String,
    /// Leading argument contributed by the host itself (empty or `*this, `)
    pub member: String,
}

impl Render for InlineReplyMethod {
    const TEMPLATE: Template = Template::InlineReplyMethod;

    fn render(&self) -> String {
        format!(
            r#"    template<typename ... Parameter>
    xpp::{namespace}::reply::{request}<Connection, xpp::generic::checked_tag>
    {method}(Parameter && ... parameter) const
    {{
      return xpp::{namespace}::{request}({connection},
          {member}std::forward<Parameter>(parameter) ...);
    }}

    template<typename ... Parameter>
    xpp::{namespace}::reply::{request}<Connection, xpp::generic::unchecked_tag>
    {method}_unchecked(Parameter && ... parameter) const
    {{
      return xpp::{namespace}::{request}_unchecked({connection},
          {member}std::forward<Parameter>(parameter) ...);
    }}
"#,
            request = self.request,
            method = self.method,
            namespace = self.namespace,
            connection = self.connection,
            member = self.member,
        )
    }
}

/// Arguments of [`Template::RequestClass`]
#[derive(Debug, Clone)]
pub struct RequestClass {
    /// Variant tag namespace (`checked` or `unchecked`)
    pub tag: String,
    /// Class name
    pub class: String,
    /// C functions wrapped by the base class, in base template order
    pub signatures: Vec<String>,
    /// Rendered constructors and operators
    pub members: Vec<String>,
    /// Whether the class keeps its connection for later redemption
    pub stores_connection: bool,
}

impl Render for RequestClass {
    const TEMPLATE: Template = Template::RequestClass;

    fn render(&self) -> String {
        let signatures = self
            .signatures
            .iter()
            .map(|s| format!("        FUNCTION_SIGNATURE({})", s))
            .collect::<Vec<_>>()
            .join(",\n");
        let connection = if self.stores_connection {
            r#"

  protected:
    operator xcb_connection_t * const(void) const
    {
      return m_c;
    }

  private:
    xcb_connection_t * m_c;"#
        } else {
            ""
        };
        format!(
            r#"namespace {tag} {{ namespace request {{

class {class}
  : public xpp::generic::{tag}::request<
{signatures}>
{{
  public:
{members}{connection}
}}; // class {class}

}}; }}; // {tag}::request::{class}
"#,
            tag = self.tag,
            class = self.class,
            signatures = signatures,
            members = self.members.join("\n\n"),
            connection = connection,
        )
    }
}

/// Arguments of [`Template::VoidDefaultConstructor`]
#[derive(Debug, Clone)]
pub struct VoidDefaultConstructor {
    /// Class name
    pub class: String,
}

impl Render for VoidDefaultConstructor {
    const TEMPLATE: Template = Template::VoidDefaultConstructor;

    fn render(&self) -> String { format!("    {}(void)\n    {{}}", self.class) }
}

/// Arguments of [`Template::VoidConstructor`]
#[derive(Debug, Clone)]
pub struct VoidConstructor {
    /// Rendered `template<...>` clause, possibly empty
    pub template_clause: String,
    /// Class name
    pub class: String,
    /// Declarations following the connection, comma-prefixed
    pub protos: String,
    /// Local initializers, each starting on a new line
    pub initializers: String,
    /// Arguments following the connection, comma-prefixed
    pub calls: String,
}

impl Render for VoidConstructor {
    const TEMPLATE: Template = Template::VoidConstructor;

    fn render(&self) -> String {
        format!(
            r#"{template_clause}    {class}(xcb_connection_t * c{protos})
    {{{initializers}
      request::operator()(c{calls});
    }}"#,
            template_clause = self.template_clause,
            class = self.class,
            protos = self.protos,
            initializers = self.initializers,
            calls = self.calls,
        )
    }
}

/// Arguments of [`Template::VoidOperator`]
#[derive(Debug, Clone)]
pub struct VoidOperator {
    /// Rendered `template<...>` clause, possibly empty
    pub template_clause: String,
    /// Declarations following the connection, comma-prefixed
    pub protos: String,
    /// Local initializers, each starting on a new line
    pub initializers: String,
    /// Arguments following the connection, comma-prefixed
    pub calls: String,
}

impl Render for VoidOperator {
    const TEMPLATE: Template = Template::VoidOperator;

    fn render(&self) -> String {
        format!(
            r#"{template_clause}    void
    operator()(xcb_connection_t * c{protos}) const
    {{{initializers}
      request::operator()(c{calls});
    }}"#,
            template_clause = self.template_clause,
            protos = self.protos,
            initializers = self.initializers,
            calls = self.calls,
        )
    }
}

/// Arguments of [`Template::CheckedReplyConstructor`]
#[derive(Debug, Clone)]
pub struct CheckedReplyConstructor {
    /// Rendered `template<...>` clause, possibly empty
    pub template_clause: String,
    /// Class name
    pub class: String,
    /// Declarations following the connection, comma-prefixed
    pub protos: String,
    /// Local initializers, each starting on a new line
    pub initializers: String,
    /// Arguments following the connection, comma-prefixed
    pub calls: String,
}

impl Render for CheckedReplyConstructor {
    const TEMPLATE: Template = Template::CheckedReplyConstructor;

    fn render(&self) -> String {
        format!(
            r#"{template_clause}    {class}(xcb_connection_t * c{protos})
    {{{initializers}
      request::prepare(c{calls});
      request::check(c);
    }}"#,
            template_clause = self.template_clause,
            class = self.class,
            protos = self.protos,
            initializers = self.initializers,
            calls = self.calls,
        )
    }
}

/// Arguments of [`Template::UncheckedReplyConstructor`]
#[derive(Debug, Clone)]
pub struct UncheckedReplyConstructor {
    /// Rendered `template<...>` clause, possibly empty
    pub template_clause: String,
    /// Class name
    pub class: String,
    /// Declarations following the connection, comma-prefixed
    pub protos: String,
    /// Local initializers, each starting on a new line
    pub initializers: String,
    /// Arguments following the connection, comma-prefixed
    pub calls: String,
}

impl Render for UncheckedReplyConstructor {
    const TEMPLATE: Template = Template::UncheckedReplyConstructor;

    fn render(&self) -> String {
        format!(
            r#"{template_clause}    {class}(xcb_connection_t * c{protos})
      : m_c(c)
    {{{initializers}
      request::prepare(c{calls});
    }}"#,
            template_clause = self.template_clause,
            class = self.class,
            protos = self.protos,
            initializers = self.initializers,
            calls = self.calls,
        )
    }
}

/// Arguments of [`Template::ReplyPayloadClass`]
#[derive(Debug, Clone)]
pub struct ReplyPayloadClass {
    /// Class name
    pub class: String,
    /// C reply structure
    pub reply_type: String,
    /// Rendered accessors in field order
    pub accessors: Vec<String>,
    /// Rendered accessor specializations in field order
    pub specializations: Vec<String>,
}

impl Render for ReplyPayloadClass {
    const TEMPLATE: Template = Template::ReplyPayloadClass;

    fn render(&self) -> String {
        format!(
            r#"namespace reply {{ namespace detail {{

class {class}
{{
  public:
    virtual ~{class}(void) {{}}

    virtual
    const {reply_type} * const
    get(void) const = 0;
{accessors}}}; // class {class}
{specializations}
}}; }}; // reply::detail::{class}
"#,
            class = self.class,
            reply_type = self.reply_type,
            accessors = blank_separated(&self.accessors),
            specializations = blank_separated(&self.specializations),
        )
    }
}

/// Arguments of [`Template::ReplyClass`]
#[derive(Debug, Clone)]
pub struct ReplyClass {
    /// Class name, shared by the payload and both request classes
    pub class: String,
    /// C reply structure
    pub reply_type: String,
}

impl Render for ReplyClass {
    const TEMPLATE: Template = Template::ReplyClass;

    fn render(&self) -> String {
        format!(
            r#"namespace reply {{

template<typename Connection, typename Check>
class {class}
  : public detail::{class}
  , public xpp::generic::reply<Connection, Check,
                               checked::request::{class},
                               unchecked::request::{class}>
{{
  public:
    typedef xpp::generic::reply<Connection, Check,
                                checked::request::{class},
                                unchecked::request::{class}> base;

    template<typename C, typename ... Parameter>
    {class}(C && c, Parameter && ... parameter)
      : base(std::forward<C>(c), std::forward<Parameter>(parameter) ...)
    {{}}

    const {reply_type} * const
    get(void) const
    {{
      return base::get();
    }}
}}; // class {class}

}}; // reply::{class}
"#,
            class = self.class,
            reply_type = self.reply_type,
        )
    }
}

/// Arguments of [`Template::ScalarAccessor`]
#[derive(Debug, Clone)]
pub struct ScalarAccessor {
    /// Field type
    pub ty: String,
    /// Accessor name
    pub name: String,
    /// Payload member read
    pub member: String,
}

impl Render for ScalarAccessor {
    const TEMPLATE: Template = Template::ScalarAccessor;

    fn render(&self) -> String {
        format!(
            r#"      {ty}
      {name}(void) const
      {{
        return this->get()->{member};
      }}"#,
            ty = self.ty,
            name = self.name,
            member = self.member,
        )
    }
}

/// Arguments of [`Template::ListAccessor`]
#[derive(Debug, Clone)]
pub struct ListAccessor {
    /// Name of the element type parameter
    pub type_param: String,
    /// Declared element type, the parameter's default
    pub ty: String,
    /// Accessor name
    pub name: String,
    /// Element count expression
    pub bound: String,
}

impl Render for ListAccessor {
    const TEMPLATE: Template = Template::ListAccessor;

    fn render(&self) -> String {
        format!(
            r#"      template<typename {param} = {ty}>
      xpp::generic::list<{param}>
      {name}(void) const
      {{
        return xpp::generic::list<{param}>(*this, {bound});
      }}"#,
            param = self.type_param,
            ty = self.ty,
            name = self.name,
            bound = self.bound,
        )
    }
}

/// Arguments of [`Template::ListAccessorSpecialization`]
#[derive(Debug, Clone)]
pub struct ListAccessorSpecialization {
    /// Declared element type
    pub ty: String,
    /// Payload class name
    pub class: String,
    /// Accessor name
    pub name: String,
    /// C helper returning the first element
    pub data_function: String,
    /// Element count expression
    pub bound: String,
}

impl Render for ListAccessorSpecialization {
    const TEMPLATE: Template = Template::ListAccessorSpecialization;

    fn render(&self) -> String {
        format!(
            r#"template<>
inline
xpp::generic::list<{ty}>
{class}::{name}<{ty}>(void) const
{{
  return xpp::generic::list<{ty}>({data_function}(this->get()), {bound});
}}"#,
            ty = self.ty,
            class = self.class,
            name = self.name,
            data_function = self.data_function,
            bound = self.bound,
        )
    }
}

/// Arguments of [`Template::ForwardDeclaration`]
#[derive(Debug, Clone)]
pub struct ForwardDeclaration {
    /// Class name
    pub class: String,
}

impl Render for ForwardDeclaration {
    const TEMPLATE: Template = Template::ForwardDeclaration;

    fn render(&self) -> String { format!("  class {};", self.class) }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_template_names_are_unique() {
        let names: HashSet<&str> = Template::ALL.iter().map(Template::name).collect();
        assert_eq!(names.len(), Template::ALL.len());
    }

    #[test]
    fn test_records_are_bound_to_their_template() {
        assert_eq!(VoidRequestFunction::TEMPLATE, Template::VoidRequestFunction);
        assert_eq!(ReplyRequestFunction::TEMPLATE.name(), "reply_request_function");
        assert_eq!(ForwardDeclaration::TEMPLATE.to_string(), "forward_declaration");
    }

    #[test]
    fn test_blank_separated() {
        assert_eq!(blank_separated(&[]), "");
        assert_eq!(blank_separated(&["a".into(), "b".into()]), "\na\n\nb\n");
    }

    #[test]
    fn test_request_class_connection_member() {
        let mut class = RequestClass {
            tag: "unchecked".into(),
            class: "query_tree".into(),
            signatures: vec!["xcb_query_tree_reply".into(), "xcb_query_tree_unchecked".into()],
            members: vec![],
            stores_connection: true,
        };
        let rendered = class.render();
        assert!(rendered.starts_with("namespace unchecked { namespace request {"));
        assert!(rendered.contains("FUNCTION_SIGNATURE(xcb_query_tree_reply),\n"));
        assert!(rendered.contains("xcb_connection_t * m_c;"));

        class.stores_connection = false;
        assert!(!class.render().contains("m_c"));
    }
}
