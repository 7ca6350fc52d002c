use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// A parser identifier that no registered plugin provides. Fatal for
/// the file being resolved, not for the run; callers may skip the file
/// and report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Couldn't find a plugin that provides the parser '{parser_name}'. Ensure the plugin is listed in the configuration's 'plugins' array.")]
pub struct UnknownParserError {
  pub parser_name: String,
}

/// What an already-loaded plugin contributes to a run. The engine never
/// loads plugin code itself; descriptors arrive materialized from the
/// plugin loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
  pub id: String,
  pub provided_parsers: Vec<String>,
}

impl PluginDescriptor {
  pub fn new(id: impl Into<String>, provided_parsers: impl IntoIterator<Item = impl Into<String>>) -> Self {
    PluginDescriptor {
      id: id.into(),
      provided_parsers: provided_parsers.into_iter().map(|name| name.into()).collect(),
    }
  }
}

/// Plugin descriptors in load order with a parser name index.
///
/// The first plugin in load order to declare a parser name owns it;
/// later duplicate declarations are silently ignored. That keeps parser
/// precedence deterministic when multiple plugins could satisfy the
/// same name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
  plugins: Vec<PluginDescriptor>,
  parser_owners: HashMap<String, usize>,
}

impl PluginRegistry {
  pub fn new(descriptors: impl IntoIterator<Item = PluginDescriptor>) -> PluginRegistry {
    let mut registry = PluginRegistry::default();
    for descriptor in descriptors {
      registry.register(descriptor);
    }
    registry
  }

  fn register(&mut self, descriptor: PluginDescriptor) {
    let index = self.plugins.len();
    for parser_name in &descriptor.provided_parsers {
      self.parser_owners.entry(parser_name.clone()).or_insert(index);
    }
    self.plugins.push(descriptor);
  }

  pub fn plugins(&self) -> &[PluginDescriptor] {
    &self.plugins
  }

  /// Gets the plugin that owns the provided parser name.
  pub fn resolve_parser(&self, parser_name: &str) -> Result<&PluginDescriptor, UnknownParserError> {
    self
      .parser_owners
      .get(parser_name)
      .map(|index| &self.plugins[*index])
      .ok_or_else(|| UnknownParserError {
        parser_name: parser_name.to_string(),
      })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn should_resolve_parser_to_providing_plugin() {
    let registry = PluginRegistry::new([PluginDescriptor::new("hugo-plugin", ["go-template"])]);
    let plugin = registry.resolve_parser("go-template").unwrap();
    assert_eq!(plugin.id, "hugo-plugin");
  }

  #[test]
  fn should_keep_first_registration_for_duplicate_parser_names() {
    let registry = PluginRegistry::new([
      PluginDescriptor::new("first-markup-plugin", ["markup", "html"]),
      PluginDescriptor::new("second-markup-plugin", ["html", "xml"]),
    ]);
    assert_eq!(registry.resolve_parser("html").unwrap().id, "first-markup-plugin");
    assert_eq!(registry.resolve_parser("xml").unwrap().id, "second-markup-plugin");
    assert_eq!(registry.plugins().len(), 2);
  }

  #[test]
  fn should_error_on_unknown_parser() {
    let registry = PluginRegistry::new([PluginDescriptor::new("hugo-plugin", ["go-template"])]);
    let err = registry.resolve_parser("swift").err().unwrap();
    assert_eq!(err.parser_name, "swift");
    assert_eq!(
      err.to_string(),
      "Couldn't find a plugin that provides the parser 'swift'. Ensure the plugin is listed in the configuration's 'plugins' array."
    );
  }
}
