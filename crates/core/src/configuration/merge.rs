use super::ConfigKeyMap;
use super::ConfigKeyValue;

/// Merges `incoming` into `target` with the incoming side winning.
///
/// Recurses only while both sides hold an object at the same key.
/// Anything else, including an object replaced by a scalar or a scalar
/// replaced by an object, is a plain overwrite.
pub fn merge_config_key_map(target: &mut ConfigKeyMap, incoming: &ConfigKeyMap) {
  for (key, incoming_value) in incoming {
    if let ConfigKeyValue::Object(incoming_obj) = incoming_value {
      if let Some(ConfigKeyValue::Object(target_obj)) = target.get_mut(key) {
        merge_config_key_map(target_obj, incoming_obj);
        continue;
      }
    }
    target.insert(key.clone(), incoming_value.clone());
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn should_overwrite_scalars_with_later_values() {
    let mut target = ConfigKeyMap::from([
      ("indent".to_string(), ConfigKeyValue::from_i32(2)),
      ("useTabs".to_string(), ConfigKeyValue::from_bool(false)),
    ]);
    let incoming = ConfigKeyMap::from([("indent".to_string(), ConfigKeyValue::from_i32(4))]);
    merge_config_key_map(&mut target, &incoming);
    assert_eq!(target.get("indent"), Some(&ConfigKeyValue::from_i32(4)));
    assert_eq!(target.get("useTabs"), Some(&ConfigKeyValue::from_bool(false)));
  }

  #[test]
  fn should_merge_nested_objects_recursively() {
    let mut target = ConfigKeyMap::from([(
      "goTemplate".to_string(),
      ConfigKeyValue::Object(ConfigKeyMap::from([
        ("bracketSpacing".to_string(), ConfigKeyValue::from_bool(true)),
        ("lineWidth".to_string(), ConfigKeyValue::from_i32(80)),
      ])),
    )]);
    let incoming = ConfigKeyMap::from([(
      "goTemplate".to_string(),
      ConfigKeyValue::Object(ConfigKeyMap::from([("lineWidth".to_string(), ConfigKeyValue::from_i32(120))])),
    )]);
    merge_config_key_map(&mut target, &incoming);
    assert_eq!(
      target.get("goTemplate"),
      Some(&ConfigKeyValue::Object(ConfigKeyMap::from([
        ("bracketSpacing".to_string(), ConfigKeyValue::from_bool(true)),
        ("lineWidth".to_string(), ConfigKeyValue::from_i32(120)),
      ])))
    );
  }

  #[test]
  fn should_overwrite_object_with_scalar() {
    let mut target = ConfigKeyMap::from([(
      "goTemplate".to_string(),
      ConfigKeyValue::Object(ConfigKeyMap::from([("bracketSpacing".to_string(), ConfigKeyValue::from_bool(true))])),
    )]);
    let incoming = ConfigKeyMap::from([("goTemplate".to_string(), ConfigKeyValue::from_bool(false))]);
    merge_config_key_map(&mut target, &incoming);
    assert_eq!(target.get("goTemplate"), Some(&ConfigKeyValue::from_bool(false)));
  }

  #[test]
  fn should_overwrite_scalar_with_object() {
    let mut target = ConfigKeyMap::from([("goTemplate".to_string(), ConfigKeyValue::from_bool(false))]);
    let incoming = ConfigKeyMap::from([(
      "goTemplate".to_string(),
      ConfigKeyValue::Object(ConfigKeyMap::from([("bracketSpacing".to_string(), ConfigKeyValue::from_bool(true))])),
    )]);
    merge_config_key_map(&mut target, &incoming);
    assert_eq!(target.get("goTemplate"), incoming.get("goTemplate"));
  }
}
