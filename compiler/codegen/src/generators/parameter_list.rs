//! Parameter lists and their derived call-site views.
//!
//! A [`ParameterList`] keeps an operation's parameters in append order and
//! derives every argument and declaration list the generators need from them.
//! All views are recomputed on demand; none of them mutates the list.
//!
//! Three views exist:
//!
//! - the *raw* view, one entry per parameter, matching the C symbol;
//! - the *wrapped* view, where adjacent parameters of one wrapped group collapse
//!   into a single aggregate object argument;
//! - the *iterator* view, the wrapped view with every iterator parameter
//!   expanded into a begin/end pair and its length parameter dropped.

use ir::{Parameter, ParameterRole};

use crate::utils::snake_to_pascal_case;
use crate::{CodegenError, Result};

/// Rendering of a single parameter in the raw view
pub trait ParameterExt {
    /// Argument expression
    fn call(&self) -> String;

    /// Declaration, with the default appended when `with_default` is set
    fn proto(&self, with_default: bool) -> String;

    /// Synthetic type parameter of an iterator parameter
    fn iterator_type(&self) -> String;
}

impl ParameterExt for Parameter {
    fn call(&self) -> String { self.name.clone() }

    fn proto(&self, with_default: bool) -> String {
        let declaration = match self.role {
            ParameterRole::Iterator { .. } => format!("const {} * {}", self.ty, self.name),
            _ => format!("{} {}", self.ty, self.name),
        };
        match (&self.default, with_default) {
            (Some(expr), true) => format!("{} = {}", declaration, expr),
            _ => declaration,
        }
    }

    fn iterator_type(&self) -> String { format!("{}Iterator", snake_to_pascal_case(&self.name)) }
}

/// One position of a derived view
#[derive(Debug, Clone)]
enum Entry<'a> {
    /// A parameter rendered on its own
    Single(&'a Parameter),
    /// Adjacent members of one wrapped group
    Group { name: &'a str, members: Vec<&'a Parameter> },
    /// An iterator parameter expanded into a begin/end pair
    Range(&'a Parameter),
}

impl Entry<'_> {
    fn name(&self) -> &str {
        match self {
            Entry::Single(p) | Entry::Range(p) => p.name.as_str(),
            Entry::Group { name, .. } => *name,
        }
    }

    fn has_default(&self) -> bool {
        match self {
            Entry::Single(p) => p.has_default(),
            Entry::Group { .. } | Entry::Range(_) => false,
        }
    }

    fn group_type(&self) -> Option<String> {
        match self {
            Entry::Group { name, .. } => Some(snake_to_pascal_case(name)),
            _ => None,
        }
    }

    fn wrapped_proto(&self, with_default: bool) -> Vec<String> {
        match self {
            Entry::Single(p) => vec![p.proto(with_default)],
            Entry::Group { name, .. } =>
                vec![format!("const {} & {}", snake_to_pascal_case(name), name)],
            Entry::Range(p) => {
                let ty = p.iterator_type();
                vec![format!("{} {}_begin", ty, p.name), format!("{} {}_end", ty, p.name)]
            }
        }
    }

    fn wrapped_calls(&self) -> Vec<String> {
        match self {
            Entry::Single(p) => vec![p.call()],
            Entry::Group { name, members } if members.len() == 1 =>
                members.iter().map(|m| format!("static_cast<{}>({})", m.ty, name)).collect(),
            Entry::Group { name, members } =>
                members.iter().map(|m| format!("{}.{}", name, m.name)).collect(),
            Entry::Range(p) => vec![format!("{}_begin", p.name), format!("{}_end", p.name)],
        }
    }
}

/// Ordered parameters of one operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    parameters: Vec<Parameter>,
}

impl ParameterList {
    /// Create an empty list
    pub fn new() -> Self { Self::default() }

    /// Append a parameter, preserving order
    pub fn add(&mut self, parameter: Parameter) { self.parameters.push(parameter); }

    /// Number of parameters
    pub fn len(&self) -> usize { self.parameters.len() }

    /// Whether the list holds no parameters
    pub fn is_empty(&self) -> bool { self.parameters.is_empty() }

    /// Parameters in append order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> { self.parameters.iter() }

    /// Separator to place between a fixed leading argument and this list
    pub fn comma(&self) -> &'static str {
        if self.parameters.is_empty() {
            ""
        } else {
            ", "
        }
    }

    /// Whether any parameter needs the wrapped or iterator views
    pub fn wants_wrap(&self) -> bool {
        self.parameters.iter().any(|p| !matches!(p.role, ParameterRole::Scalar))
    }

    /// Argument expressions of the raw view
    pub fn calls(&self, sort: bool) -> Vec<String> {
        sorted(self.raw_entries(), sort).iter().flat_map(Entry::wrapped_calls).collect()
    }

    /// Declarations of the raw view
    pub fn protos(&self, sort: bool, defaults: bool) -> Result<Vec<String>> {
        render_protos(self.raw_entries(), sort, defaults)
    }

    /// Argument expressions of the wrapped view, one per underlying parameter
    pub fn wrapped_calls(&self, sort: bool) -> Vec<String> {
        sorted(self.wrapped_entries(), sort).iter().flat_map(Entry::wrapped_calls).collect()
    }

    /// Declarations of the wrapped view, one per aggregate or parameter
    pub fn wrapped_protos(&self, sort: bool, defaults: bool) -> Result<Vec<String>> {
        render_protos(self.wrapped_entries(), sort, defaults)
    }

    /// Arguments of the C symbol inside an iterator overload
    ///
    /// Iterator parameters pass the data of their local vector, length
    /// parameters pass that vector's size.
    pub fn iterator_calls(&self, sort: bool) -> Vec<String> {
        sorted(self.wrapped_entries(), sort)
            .iter()
            .flat_map(|entry| match entry {
                Entry::Single(p) if p.is_iterator() => vec![format!("{}.data()", p.name)],
                Entry::Single(p) => match self.iterator_for_length(&p.name) {
                    Some(list) => vec![format!("static_cast<{}>({}.size())", p.ty, list.name)],
                    None => vec![p.call()],
                },
                other => other.wrapped_calls(),
            })
            .collect()
    }

    /// Forwarding arguments matching [`ParameterList::iterator_protos`] position by position
    pub fn iterator_2nd_lvl_calls(&self, sort: bool) -> Vec<String> {
        sorted(self.iterator_entries(), sort)
            .iter()
            .flat_map(|entry| match entry {
                Entry::Group { name, .. } => vec![name.to_string()],
                other => other.wrapped_calls(),
            })
            .collect()
    }

    /// Declarations of the iterator view
    pub fn iterator_protos(&self, sort: bool, defaults: bool) -> Result<Vec<String>> {
        render_protos(self.iterator_entries(), sort, defaults)
    }

    /// Local vectors built from each iterator pair, in parameter order
    pub fn iterator_initializers(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.is_iterator())
            .map(|p| format!("std::vector<{ty}> {n}({n}_begin, {n}_end);", ty = p.ty, n = p.name))
            .collect()
    }

    /// Type parameters introduced by wrapped groups
    pub fn templates(&self) -> Vec<String> {
        self.wrapped_entries().iter().filter_map(Entry::group_type).collect()
    }

    /// Type parameters introduced by iterator parameters
    pub fn iterator_templates(&self) -> Vec<String> {
        self.parameters.iter().filter(|p| p.is_iterator()).map(|p| p.iterator_type()).collect()
    }

    /// `template<...>` clause for the wrapped view, empty without wrapped groups
    pub fn template_clause(&self, indent: &str, tail: &str) -> String {
        clause(indent, tail, &self.templates())
    }

    /// `template<...>` clause for the iterator view, empty without iterator parameters
    ///
    /// Iterator types come first, followed by the wrapped group types.
    pub fn iterator_template_clause(&self, indent: &str, tail: &str) -> String {
        let iterators = self.iterator_templates();
        if iterators.is_empty() {
            return String::new();
        }
        let mut all = iterators;
        all.extend(self.templates());
        clause(indent, tail, &all)
    }

    fn raw_entries(&self) -> Vec<Entry<'_>> { self.parameters.iter().map(Entry::Single).collect() }

    fn wrapped_entries(&self) -> Vec<Entry<'_>> {
        let mut entries: Vec<Entry<'_>> = Vec::with_capacity(self.parameters.len());
        for p in &self.parameters {
            if let (Some(group), Some(Entry::Group { name, members })) =
                (p.group(), entries.last_mut())
            {
                if *name == group {
                    members.push(p);
                    continue;
                }
            }
            match p.group() {
                Some(group) => entries.push(Entry::Group { name: group, members: vec![p] }),
                None => entries.push(Entry::Single(p)),
            }
        }
        entries
    }

    fn iterator_entries(&self) -> Vec<Entry<'_>> {
        self.wrapped_entries()
            .into_iter()
            .filter(|entry| match entry {
                Entry::Single(p) => self.iterator_for_length(&p.name).is_none(),
                _ => true,
            })
            .map(|entry| match entry {
                Entry::Single(p) if p.is_iterator() => Entry::Range(p),
                other => other,
            })
            .collect()
    }

    fn iterator_for_length(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| {
            matches!(&p.role, ParameterRole::Iterator { length: Some(length) } if length == name)
        })
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self { parameters: iter.into_iter().collect() }
    }
}

/// Stable partition of required entries before defaulted ones
fn sorted(entries: Vec<Entry<'_>>, sort: bool) -> Vec<Entry<'_>> {
    if !sort {
        return entries;
    }
    let (required, defaulted): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| !entry.has_default());
    required.into_iter().chain(defaulted).collect()
}

fn render_protos(entries: Vec<Entry<'_>>, sort: bool, defaults: bool) -> Result<Vec<String>> {
    if !sort && defaults {
        check_default_order(&entries)?;
    }
    Ok(sorted(entries, sort).iter().flat_map(|entry| entry.wrapped_proto(defaults)).collect())
}

/// A declaration list with defaults must not place a default before a required entry
fn check_default_order(entries: &[Entry<'_>]) -> Result<()> {
    let mut defaulted: Option<&str> = None;
    for entry in entries {
        match (defaulted, entry.has_default()) {
            (None, true) => defaulted = Some(entry.name()),
            (Some(parameter), false) => {
                return Err(CodegenError::MalformedParameterOrder {
                    parameter: parameter.to_string(),
                    following: entry.name().to_string(),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

fn clause(indent: &str, tail: &str, types: &[String]) -> String {
    if types.is_empty() {
        String::new()
    } else {
        format!("{}template<typename {}>{}", indent, types.join(", typename "), tail)
    }
}
