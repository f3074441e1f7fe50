//! Generation options for the pipeline.
//!
//! This module gathers the switches that shape generation of a whole protocol,
//! built either from a [`Config`] or explicitly through [`Options::builder`].

use std::collections::BTreeMap;

use codegen::ResourceFragments;
use config::Config;
use ir::Protocol;

/// Switches applied to every operation of a protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Overrides every namespace's method injection switch when set
    pub inject_methods: Option<bool>,
    /// Emit the wrapped and iterator overloads
    pub wrap: bool,
    /// Extra resource fragment exceptions, on top of the built-in ones
    pub fragment_exceptions: BTreeMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self { inject_methods: None, wrap: true, fragment_exceptions: BTreeMap::new() }
    }
}

impl Options {
    /// Create a new builder for Options
    pub fn builder() -> OptionsBuilder { OptionsBuilder::default() }

    /// Options described by the `[codegen]` section of `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            inject_methods: config.codegen.inject_methods,
            wrap: config.codegen.wrap,
            fragment_exceptions: config.codegen.fragment_exceptions.clone(),
        }
    }

    /// Resource fragment mapping for `protocol`
    pub fn fragments(&self, protocol: &Protocol) -> ResourceFragments {
        ResourceFragments::new(protocol.resources(), &self.fragment_exceptions)
    }
}

#[derive(Debug, Default)]
/// Builder for Options
pub struct OptionsBuilder {
    inject_methods: Option<bool>,
    wrap: Option<bool>,
    fragment_exceptions: BTreeMap<String, String>,
}

impl OptionsBuilder {
    /// Force method injection on or off for every namespace
    pub fn inject_methods(mut self, inject: bool) -> Self {
        self.inject_methods = Some(inject);
        self
    }

    /// Enable or disable the wrapped and iterator overloads
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }

    /// Add a resource fragment exception
    pub fn fragment_exception(mut self, resource: &str, fragment: &str) -> Self {
        self.fragment_exceptions.insert(resource.to_string(), fragment.to_string());
        self
    }

    /// Build the Options
    pub fn build(self) -> Options {
        Options {
            inject_methods: self.inject_methods,
            wrap: self.wrap.unwrap_or(true),
            fragment_exceptions: self.fragment_exceptions,
        }
    }
}
