//! Static value generator and YAML to `Value` conversion.

use mock_core::{Record, Value};
use serde_yaml::Value as YamlValue;

/// Convert a YAML value to a `Value`.
pub fn yaml_to_value(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(arr) => Value::List(arr.iter().map(yaml_to_value).collect()),
        YamlValue::Mapping(map) => {
            let record: Record = map
                .iter()
                .filter_map(|(k, v)| {
                    let key = match k {
                        YamlValue::String(s) => s.clone(),
                        YamlValue::Number(n) => n.to_string(),
                        YamlValue::Bool(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((key, yaml_to_value(v)))
                })
                .collect();
            Value::Object(record)
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
