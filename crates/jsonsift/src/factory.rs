use crate::{
    number::Number,
    options::{MapRepresentation, ParseOptions},
    value::{Array, Map, Value},
};

/// Abstraction over value construction used by the
/// [`ObjectBuilder`](crate::ObjectBuilder).
///
/// Implement this to reconstruct subtrees straight into your own value type.
#[allow(clippy::wrong_self_convention)]
pub trait ValueFactory {
    type Value;
    type Array;
    type Map;

    fn null(&self) -> Self::Value;
    fn boolean(&self, b: bool) -> Self::Value;
    fn number(&self, n: Number) -> Self::Value;
    fn string(&self, s: String) -> Self::Value;
    fn new_array(&self) -> Self::Array;
    fn new_map(&self) -> Self::Map;

    fn push_array(&self, array: &mut Self::Array, value: Self::Value);
    fn insert_map(&self, map: &mut Self::Map, key: String, value: Self::Value);

    fn from_array(&self, array: Self::Array) -> Self::Value;
    fn from_map(&self, map: Self::Map) -> Self::Value;
}

/// Factory producing [`Value`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFactory {
    map_representation: MapRepresentation,
}

impl StdFactory {
    #[must_use]
    pub fn new(map_representation: MapRepresentation) -> Self {
        Self { map_representation }
    }

    #[must_use]
    pub fn from_options(options: &ParseOptions) -> Self {
        Self::new(options.map_representation)
    }
}

impl ValueFactory for StdFactory {
    type Value = Value;
    type Array = Array;
    type Map = Map;

    #[inline]
    fn null(&self) -> Value {
        Value::Null
    }

    #[inline]
    fn boolean(&self, b: bool) -> Value {
        Value::Boolean(b)
    }

    #[inline]
    fn number(&self, n: Number) -> Value {
        Value::Number(n)
    }

    #[inline]
    fn string(&self, s: String) -> Value {
        Value::String(s)
    }

    #[inline]
    fn new_array(&self) -> Array {
        Vec::new()
    }

    #[inline]
    fn new_map(&self) -> Map {
        Map::new(self.map_representation)
    }

    #[inline]
    fn push_array(&self, array: &mut Array, value: Value) {
        array.push(value);
    }

    #[inline]
    fn insert_map(&self, map: &mut Map, key: String, value: Value) {
        map.insert(key, value);
    }

    #[inline]
    fn from_array(&self, array: Array) -> Value {
        Value::Array(array)
    }

    #[inline]
    fn from_map(&self, map: Map) -> Value {
        Value::Object(map)
    }
}
