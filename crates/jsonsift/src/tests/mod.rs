mod disciplines;
mod property_partition;

use crate::{Map, MapRepresentation, Number, Value};

/// Converts a `serde_json` value, used as an independent oracle.
pub(crate) fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Number(Number::Integer(i)),
            (None, Some(f)) => Value::Number(Number::Float(f)),
            (None, None) => unreachable!("serde_json numbers are i64, u64 or f64"),
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

pub(crate) fn quickcheck_tests() -> u64 {
    if cfg!(feature = "test-fast") {
        50
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
