#![allow(missing_docs)]

use jsonsift::{
    Number, ParseOptions, ValueFactory, items_push_with_factory, items_with_factory,
    kvitems_with_factory,
};
use serde_json::{Map, Value, json};

mod common;

use common::DOC;

/// Rebuilds subtrees straight into `serde_json` values.
struct SerdeFactory;

impl ValueFactory for SerdeFactory {
    type Value = Value;
    type Array = Vec<Value>;
    type Map = Map<String, Value>;

    fn null(&self) -> Value {
        Value::Null
    }

    fn boolean(&self, b: bool) -> Value {
        Value::Bool(b)
    }

    fn number(&self, n: Number) -> Value {
        match n {
            Number::Integer(i) => i.into(),
            Number::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
            other => other
                .to_string()
                .parse::<serde_json::Number>()
                .map_or(Value::Null, Value::Number),
        }
    }

    fn string(&self, s: String) -> Value {
        Value::String(s)
    }

    fn new_array(&self) -> Vec<Value> {
        Vec::new()
    }

    fn new_map(&self) -> Map<String, Value> {
        Map::new()
    }

    fn push_array(&self, array: &mut Vec<Value>, value: Value) {
        array.push(value);
    }

    fn insert_map(&self, map: &mut Map<String, Value>, key: String, value: Value) {
        map.insert(key, value);
    }

    fn from_array(&self, array: Vec<Value>) -> Value {
        Value::Array(array)
    }

    fn from_map(&self, map: Map<String, Value>) -> Value {
        Value::Object(map)
    }
}

fn approximate() -> ParseOptions {
    ParseOptions {
        use_exact_numbers: false,
        ..ParseOptions::default()
    }
}

#[test]
fn documents_rebuild_like_serde_json() {
    let expected: Value = serde_json::from_str(DOC).unwrap();
    let docs: Vec<Value> = items_with_factory(DOC.as_bytes(), "docs.item", &approximate(), SerdeFactory)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(Value::Array(docs), expected["docs"]);
}

#[test]
fn member_pairs_use_the_factory() {
    let pairs: Vec<(String, Value)> = kvitems_with_factory(
        &br#"{"a": {"b": [1, "two", null]}, "c": false}"#[..],
        "",
        &approximate(),
        SerdeFactory,
    )
    .collect::<Result<_, _>>()
    .unwrap();
    assert_eq!(
        pairs,
        [
            ("a".to_string(), json!({"b": [1, "two", null]})),
            ("c".to_string(), json!(false)),
        ]
    );
}

#[test]
fn exact_decimals_go_through_their_text() {
    let values: Vec<Value> = items_with_factory(
        &b"[0.25, 123456789012345678901234567890]"[..],
        "item",
        &ParseOptions::default(),
        SerdeFactory,
    )
    .collect::<Result<_, _>>()
    .unwrap();
    assert_eq!(values[0], json!(0.25));
    assert!(values[1].is_number());
}

#[test]
fn push_with_factory() {
    let mut pusher = items_push_with_factory(Vec::new(), "item", &approximate(), SerdeFactory);
    pusher.feed(br#"[{"k": "#).unwrap();
    pusher.feed(br#"[true]}, 3.5]"#).unwrap();
    let values = pusher.close().unwrap();
    assert_eq!(values, [json!({"k": [true]}), json!(3.5)]);
}
