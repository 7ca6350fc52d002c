use once_cell::sync::Lazy;

use crate::configuration::ConfigKeyMap;
use crate::configuration::ConfigKeyValue;
use crate::configuration::ConfigLayer;
use crate::configuration::OverrideRule;

static RECOMMENDED: Lazy<ConfigLayer> = Lazy::new(|| ConfigLayer {
  name: "recommended".to_string(),
  extends: None,
  plugins: vec!["hugo-plugin".to_string()],
  overrides: vec![OverrideRule {
    // typical Hugo template extensions go to the go-template parser
    patterns: vec!["**/*.html".to_string()],
    options: ConfigKeyMap::from([("parser".to_string(), ConfigKeyValue::from_str("go-template"))]),
  }],
  base_options: ConfigKeyMap::from([("goTemplateBracketSpacing".to_string(), ConfigKeyValue::from_bool(true))]),
});

/// The recommended preset for Hugo template projects. User layers
/// typically extend this by name.
pub fn recommended() -> &'static ConfigLayer {
  &RECOMMENDED
}
