//! Method-injection hosts and resource name fragments.
//!
//! An operation whose first parameter is a resource (a window, a graphics
//! context, ...) can be injected as a method onto that resource's class. The
//! method then loses the fragment of its name that names the resource:
//! `get_window_attributes` becomes `window.get_attributes()`. The fragment of
//! each resource is computed once, here, from the protocol's resources and an
//! exception table for the names that do not appear literally.

use std::collections::BTreeMap;

use ir::{Request, Resource};

use crate::{CodegenError, Result};

/// Resources whose embedded fragment differs from their name
pub const DEFAULT_FRAGMENT_EXCEPTIONS: &[(&str, &str)] = &[("gcontext", "gc")];

/// Type a generated method is injected into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host<'a> {
    /// The raw connection
    Connection,
    /// An instance of a resource class
    Resource(&'a Resource),
}

impl Host<'_> {
    /// Name of the host, used to group emitted method blocks
    pub fn name(&self) -> &str {
        match self {
            Host::Connection => "connection",
            Host::Resource(resource) => resource.name.as_str(),
        }
    }

    /// Expression yielding the connection from inside a host method
    pub fn connection_expr(&self) -> &'static str {
        match self {
            Host::Connection => "static_cast<const Connection &>(*this)",
            Host::Resource(_) => "this->connection()",
        }
    }

    /// Leading argument the host contributes to every call
    pub fn member(&self) -> &'static str {
        match self {
            Host::Connection => "",
            Host::Resource(_) => "*this, ",
        }
    }
}

/// Mapping from resource identity to the fragment its operations embed
#[derive(Debug, Clone, Default)]
pub struct ResourceFragments {
    entries: Vec<(Resource, String)>,
}

impl ResourceFragments {
    /// Build the mapping from `resources`, the default exceptions and `exceptions`
    ///
    /// Entries of `exceptions` take precedence over the defaults.
    pub fn new(resources: &[Resource], exceptions: &BTreeMap<String, String>) -> Self {
        let mut table: BTreeMap<&str, &str> =
            DEFAULT_FRAGMENT_EXCEPTIONS.iter().copied().collect();
        for (resource, fragment) in exceptions {
            table.insert(resource.as_str(), fragment.as_str());
        }
        let entries = resources
            .iter()
            .map(|r| {
                let fragment = table.get(r.name.as_str()).copied().unwrap_or(r.name.as_str());
                (r.clone(), fragment.to_string())
            })
            .collect();
        Self { entries }
    }

    /// Build the mapping with the default exceptions only
    pub fn from_resources(resources: &[Resource]) -> Self {
        Self::new(resources, &BTreeMap::new())
    }

    /// Known resources
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter().map(|(r, _)| r)
    }

    /// Fragment a known resource's operations embed
    pub fn fragment(&self, resource: &str) -> Option<&str> {
        self.entries.iter().find(|(r, _)| r.name == resource).map(|(_, f)| f.as_str())
    }

    /// Method name of `operation` when injected onto `resource`
    ///
    /// Removes the first `_<fragment>` occurrence ending at a word boundary.
    /// Resources missing from the mapping use their own name as fragment.
    pub fn strip(&self, operation: &str, resource: &str) -> Result<String> {
        let fragment = self.fragment(resource).unwrap_or(resource);
        let start = find_fragment(operation, fragment).ok_or_else(|| {
            CodegenError::UnknownResourceFragment {
                operation: operation.to_string(),
                resource: resource.to_string(),
                fragment: fragment.to_string(),
            }
        })?;
        let end = start + fragment.len() + 1;
        Ok(format!("{}{}", &operation[..start], &operation[end..]))
    }

    /// Hosts `request` is injected into: the connection, then every resource
    /// whose type matches the first parameter
    ///
    /// Whether the operation name embeds the resource's fragment is checked
    /// later, by [`ResourceFragments::strip`].
    pub fn hosts_for(&self, request: &Request) -> Vec<Host<'_>> {
        let mut hosts = vec![Host::Connection];
        if let Some(first) = request.first_parameter() {
            hosts.extend(
                self.entries
                    .iter()
                    .filter(|(r, _)| r.ty == first.ty)
                    .map(|(r, _)| Host::Resource(r)),
            );
        }
        hosts
    }
}

/// Byte offset of the first `_<fragment>` in `operation` that ends at a word boundary
fn find_fragment(operation: &str, fragment: &str) -> Option<usize> {
    if fragment.is_empty() {
        return None;
    }
    let needle = format!("_{}", fragment);
    operation.match_indices(&needle).map(|(i, _)| i).find(|&i| {
        let rest = &operation[i + needle.len()..];
        rest.is_empty() || rest.starts_with('_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_fragment_respects_word_boundaries() {
        assert_eq!(find_fragment("map_window", "window"), Some(3));
        assert_eq!(find_fragment("get_window_attributes", "window"), Some(3));
        assert_eq!(find_fragment("destroy_subwindows", "window"), None);
        assert_eq!(find_fragment("list_windows", "window"), None);
        assert_eq!(find_fragment("query_tree", ""), None);
    }
}
