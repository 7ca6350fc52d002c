use indexmap::IndexSet;
use thiserror::Error;

use crate::utils::glob::GlobMatcher;
use crate::utils::glob::GlobMatcherOptions;
use crate::utils::glob::PatternSyntaxError;

use super::merge_config_key_map;
use super::ConfigKeyMap;
use super::ConfigKeyValue;
use super::ConfigLayer;
use super::OverrideRule;

/// A problem in the configuration itself. All variants abort loading
/// since a silently dropped rule changes formatting behavior invisibly.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration '{layer}' is part of an extends cycle ({chain}).")]
  CyclicExtends { layer: String, chain: String },
  #[error("Couldn't find the configuration '{name}' extended by '{child}'.")]
  UnknownExtends { name: String, child: String },
  #[error("Couldn't find a configuration named '{name}'.")]
  UnknownLayer { name: String },
  #[error("Override {index} of configuration '{layer}' has an invalid pattern. {source}")]
  Pattern {
    layer: String,
    index: usize,
    #[source]
    source: PatternSyntaxError,
  },
  #[error("Override {index} of configuration '{layer}' must provide 'parser' as a string.")]
  UnexpectedParserValue { layer: String, index: usize },
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

#[derive(Debug)]
pub(crate) struct CompiledOverrideRule {
  pub matcher: GlobMatcher,
  pub parser: Option<String>,
  pub options: ConfigKeyMap,
}

/// A layer with its ancestor chain resolved into one ordered plugin
/// list and one ordered override rule sequence. Immutable once built;
/// construct it once per formatting run.
#[derive(Debug)]
pub struct FlatLayer {
  pub plugins: Vec<String>,
  pub base_options: ConfigKeyMap,
  pub(crate) overrides: Vec<CompiledOverrideRule>,
}

impl FlatLayer {
  /// Flattens the layer named `leaf_name` against the other layers in
  /// `layers` that it extends.
  ///
  /// Ancestors contribute before descendants: plugins are concatenated
  /// ancestor-first with duplicates dropped (first occurrence wins, so
  /// an ancestor's plugin keeps its registration order), base options
  /// are merged child-over-ancestor, and override rules are
  /// concatenated ancestor-first so child rules evaluate later and win.
  ///
  /// Every rule's patterns compile here, which surfaces pattern errors
  /// before any file resolves.
  pub fn from_layers(layers: &[ConfigLayer], leaf_name: &str) -> Result<FlatLayer, ConfigError> {
    let chain = resolve_extends_chain(layers, leaf_name)?;

    let mut plugins = Vec::new();
    let mut seen_plugins = IndexSet::new();
    let mut base_options = ConfigKeyMap::new();
    let mut overrides = Vec::new();
    for layer in chain {
      for plugin in &layer.plugins {
        if seen_plugins.insert(plugin.clone()) {
          plugins.push(plugin.clone());
        }
      }
      merge_config_key_map(&mut base_options, &layer.base_options);
      for (index, rule) in layer.overrides.iter().enumerate() {
        overrides.push(compile_override_rule(&layer.name, index, rule)?);
      }
    }

    tracing::debug!(layer = leaf_name, plugins = plugins.len(), overrides = overrides.len(), "flattened configuration");

    Ok(FlatLayer {
      plugins,
      base_options,
      overrides,
    })
  }

  pub fn override_count(&self) -> usize {
    self.overrides.len()
  }
}

/// Walks `extends` links from the leaf and returns the chain ordered
/// root-first. Revisiting a layer is a cycle and fails naming the
/// repeated layer.
fn resolve_extends_chain<'a>(layers: &'a [ConfigLayer], leaf_name: &str) -> Result<Vec<&'a ConfigLayer>, ConfigError> {
  let leaf = find_layer(layers, leaf_name).ok_or_else(|| ConfigError::UnknownLayer { name: leaf_name.to_string() })?;

  let mut visited = IndexSet::new();
  visited.insert(leaf.name.as_str());
  let mut chain = vec![leaf];
  let mut current = leaf;
  while let Some(parent_name) = current.extends.as_deref() {
    let parent = find_layer(layers, parent_name).ok_or_else(|| ConfigError::UnknownExtends {
      name: parent_name.to_string(),
      child: current.name.clone(),
    })?;
    if !visited.insert(parent.name.as_str()) {
      let mut chain_text = visited.iter().copied().collect::<Vec<_>>().join(" -> ");
      chain_text.push_str(" -> ");
      chain_text.push_str(&parent.name);
      return Err(ConfigError::CyclicExtends {
        layer: parent.name.clone(),
        chain: chain_text,
      });
    }
    chain.push(parent);
    current = parent;
  }

  chain.reverse();
  Ok(chain)
}

fn find_layer<'a>(layers: &'a [ConfigLayer], name: &str) -> Option<&'a ConfigLayer> {
  layers.iter().find(|layer| layer.name == name)
}

fn compile_override_rule(layer_name: &str, index: usize, rule: &OverrideRule) -> Result<CompiledOverrideRule, ConfigError> {
  let matcher = GlobMatcher::new(&rule.patterns, &GlobMatcherOptions::default()).map_err(|source| ConfigError::Pattern {
    layer: layer_name.to_string(),
    index,
    source,
  })?;
  let mut options = rule.options.clone();
  let parser = match options.shift_remove("parser") {
    Some(ConfigKeyValue::String(parser)) => Some(parser),
    Some(_) => {
      return Err(ConfigError::UnexpectedParserValue {
        layer: layer_name.to_string(),
        index,
      })
    }
    None => None,
  };
  Ok(CompiledOverrideRule { matcher, parser, options })
}
