use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// An option bag. Keys are case-sensitive and unique; insertion order
/// is kept only so serialized configuration round-trips faithfully.
pub type ConfigKeyMap = IndexMap<String, ConfigKeyValue>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigKeyValue {
  String(String),
  Number(i32),
  Bool(bool),
  Array(Vec<ConfigKeyValue>),
  Object(ConfigKeyMap),
  Null,
}

impl ConfigKeyValue {
  pub fn from_i32(value: i32) -> ConfigKeyValue {
    ConfigKeyValue::Number(value)
  }

  pub fn from_str(value: &str) -> ConfigKeyValue {
    ConfigKeyValue::String(value.to_string())
  }

  pub fn from_bool(value: bool) -> ConfigKeyValue {
    ConfigKeyValue::Bool(value)
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      ConfigKeyValue::String(value) => Some(value),
      _ => None,
    }
  }
}

/// Routes files matching a glob pattern list to a set of option
/// changes. Serializes with the `files` key used by preset files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
  #[serde(rename = "files", default)]
  pub patterns: Vec<String>,
  #[serde(default)]
  pub options: ConfigKeyMap,
}

/// One named configuration unit (a preset or a user configuration),
/// possibly extending another layer by name.
///
/// Any top-level key that isn't `name`, `extends`, `plugins` or
/// `overrides` deserializes into `base_options`, which is the shape
/// preset files are written in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extends: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub plugins: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub overrides: Vec<OverrideRule>,
  #[serde(flatten)]
  pub base_options: ConfigKeyMap,
}

impl ConfigLayer {
  pub fn from_json(text: &str) -> Result<ConfigLayer, crate::configuration::ConfigError> {
    serde_json::from_str(text).map_err(|err| anyhow::anyhow!("Error deserializing configuration. {}", err).into())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn should_deserialize_preset_shape() {
    let layer = ConfigLayer::from_json(
      r#"{
        "plugins": ["hugo-plugin"],
        "goTemplateBracketSpacing": true,
        "overrides": [{
          "files": ["**/*.html"],
          "options": { "parser": "go-template" }
        }]
      }"#,
    )
    .unwrap();

    assert_eq!(layer.plugins, vec!["hugo-plugin".to_string()]);
    assert_eq!(
      layer.base_options,
      ConfigKeyMap::from([("goTemplateBracketSpacing".to_string(), ConfigKeyValue::from_bool(true))])
    );
    assert_eq!(layer.overrides.len(), 1);
    assert_eq!(layer.overrides[0].patterns, vec!["**/*.html".to_string()]);
    assert_eq!(layer.overrides[0].options.get("parser"), Some(&ConfigKeyValue::from_str("go-template")));
    assert_eq!(layer.extends, None);
  }

  #[test]
  fn should_round_trip_nested_options() {
    let layer = ConfigLayer {
      name: "user".to_string(),
      base_options: ConfigKeyMap::from([(
        "goTemplate".to_string(),
        ConfigKeyValue::Object(ConfigKeyMap::from([("bracketSpacing".to_string(), ConfigKeyValue::from_bool(false))])),
      )]),
      ..Default::default()
    };
    let text = serde_json::to_string(&layer).unwrap();
    let deserialized = ConfigLayer::from_json(&text).unwrap();
    assert_eq!(deserialized, layer);
  }

  #[test]
  fn should_error_on_invalid_json() {
    let err = ConfigLayer::from_json("{").err().unwrap();
    assert!(err.to_string().starts_with("Error deserializing configuration."));
  }
}
