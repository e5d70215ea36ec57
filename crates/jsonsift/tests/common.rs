#![allow(missing_docs)]
#![allow(dead_code)]

use jsonsift::{Map, MapRepresentation, Number, Value};

/// A document exercising every event kind, escapes, non-ASCII keys and
/// nested containers under the same key.
pub const DOC: &str = r#"{
  "docs": [
    {
      "null": null,
      "boolean": false,
      "true": true,
      "integer": 0,
      "double": 0.5,
      "exponent": 1.0e+2,
      "long": 10000000000,
      "string": "строка - тест",
      "ñandú": null
    },
    {"meta": [[1], {}]},
    {"meta": {"key": "value"}},
    {"meta": null},
    {"meta": []}
  ]
}"#;

pub const SCENARIO: &str = r#"{"a": 1, "b": [2, 3]}"#;

pub const CHUNK_SIZES: [usize; 7] = [1, 4, 16, 64, 256, 1024, 4098];

/// Converts a `serde_json` value, used as an independent oracle.
pub fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Number(Number::Integer(i)),
            None => Value::Number(Number::Float(n.as_f64().unwrap())),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(members) => {
            let mut map = Map::new(MapRepresentation::Ordered);
            for (k, v) in members {
                map.insert(k.clone(), from_serde(v));
            }
            Value::Object(map)
        }
    }
}

pub fn oracle(text: &str) -> Value {
    from_serde(&serde_json::from_str(text).unwrap())
}
