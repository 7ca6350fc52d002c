use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::configuration::merge_config_key_map;
use crate::configuration::ConfigKeyMap;
use crate::configuration::FlatLayer;
use crate::plugins::PluginRegistry;
use crate::plugins::UnknownParserError;

/// The fully-merged configuration for one file path. Owned by the
/// caller that requested resolution; carries no references back into
/// the layer stack.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveConfig {
  pub parser: String,
  pub options: ConfigKeyMap,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
  #[error("No override rule selected a parser for '{path}' and no default parser was provided.")]
  NoMatch { path: String },
  #[error(transparent)]
  UnknownParser(#[from] UnknownParserError),
}

/// Resolves the effective configuration for file paths against a
/// flattened layer and a plugin registry. Immutable after construction,
/// so it can be shared across a worker pool without locking.
#[derive(Debug)]
pub struct OverrideResolver {
  flat_layer: FlatLayer,
  registry: PluginRegistry,
}

impl OverrideResolver {
  pub fn new(flat_layer: FlatLayer, registry: PluginRegistry) -> OverrideResolver {
    OverrideResolver { flat_layer, registry }
  }

  pub fn flat_layer(&self) -> &FlatLayer {
    &self.flat_layer
  }

  pub fn registry(&self) -> &PluginRegistry {
    &self.registry
  }

  /// Resolves `path`, requiring some override rule to have selected a
  /// parser.
  pub fn resolve(&self, path: &str) -> Result<EffectiveConfig, ResolveError> {
    let (parser, options) = self.apply_overrides(path);
    match parser {
      Some(parser) => self.finalize(path, parser, options),
      None => Err(ResolveError::NoMatch { path: path.to_string() }),
    }
  }

  /// Resolves `path`, falling back to `default_parser` when no override
  /// rule selected one. The default is validated against the registry
  /// like any other parser.
  pub fn resolve_with_default(&self, path: &str, default_parser: &str) -> Result<EffectiveConfig, ResolveError> {
    let (parser, options) = self.apply_overrides(path);
    let parser = parser.unwrap_or_else(|| default_parser.to_string());
    self.finalize(path, parser, options)
  }

  /// Walks the flattened rules in order. Later matching rules merge
  /// over earlier ones, so precedence is expressed purely by
  /// declaration order, never by pattern specificity.
  fn apply_overrides(&self, path: &str) -> (Option<String>, ConfigKeyMap) {
    let mut options = self.flat_layer.base_options.clone();
    let mut parser = None;
    for rule in &self.flat_layer.overrides {
      if rule.matcher.is_match(path) {
        merge_config_key_map(&mut options, &rule.options);
        if let Some(rule_parser) = &rule.parser {
          parser = Some(rule_parser.clone());
        }
      }
    }
    (parser, options)
  }

  fn finalize(&self, path: &str, parser: String, options: ConfigKeyMap) -> Result<EffectiveConfig, ResolveError> {
    self.registry.resolve_parser(&parser)?;
    tracing::trace!(path, parser = parser.as_str(), "resolved configuration");
    Ok(EffectiveConfig { parser, options })
  }
}

/// Memoizes resolution results per distinct path for the duration of a
/// run. Dropping the cache at run end discards all entries; nothing
/// persists across runs.
///
/// Both successes and per-file errors are cached. Resolution is a pure
/// function of the path and the static layer stack, so a hit is
/// indistinguishable from a fresh resolution.
#[derive(Debug)]
pub struct ResolutionCache {
  resolver: OverrideResolver,
  entries: RwLock<HashMap<String, Result<Arc<EffectiveConfig>, ResolveError>>>,
}

impl ResolutionCache {
  pub fn new(resolver: OverrideResolver) -> ResolutionCache {
    ResolutionCache {
      resolver,
      entries: RwLock::new(HashMap::new()),
    }
  }

  pub fn resolver(&self) -> &OverrideResolver {
    &self.resolver
  }

  pub fn get_or_resolve(&self, path: &str) -> Result<Arc<EffectiveConfig>, ResolveError> {
    if let Some(result) = self.entries.read().get(path) {
      return result.clone();
    }
    let result = self.resolver.resolve(path).map(Arc::new);
    // keep whichever entry won if another worker resolved concurrently
    self.entries.write().entry(path.to_string()).or_insert(result).clone()
  }
}
