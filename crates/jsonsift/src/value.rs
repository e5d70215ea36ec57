//! Reconstructed JSON values.
//!
//! [`Value`] is what the default [`StdFactory`](crate::StdFactory) builds for
//! `items`/`kvitems`. Objects are stored in a [`Map`] whose concrete
//! representation follows
//! [`ParseOptions::map_representation`](crate::ParseOptions::map_representation).

use std::collections::{HashMap, hash_map};

use indexmap::{IndexMap, map as index_map};

use crate::{number::Number, options::MapRepresentation};

pub type Array = Vec<Value>;

/// A JSON value.
///
/// # Examples
///
/// ```
/// use jsonsift::{Map, MapRepresentation, Value};
///
/// let mut map = Map::new(MapRepresentation::Ordered);
/// map.insert("key".to_string(), Value::from("value"));
/// let v = Value::Object(map);
/// assert_eq!(v.get("key").and_then(Value::as_str), Some("value"));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v.into())
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonsift::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    /// Returns `true` if the value is [`Number`](Value::Number).
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonsift::Value;
    ///
    /// assert!(Value::from(42).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Look up an object member. `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }
}

/// Object members, in the representation chosen by
/// [`MapRepresentation`].
///
/// Equality ignores member order, so an ordered and an unordered map with the
/// same members compare equal.
#[derive(Clone, Debug)]
pub enum Map {
    Ordered(IndexMap<String, Value>),
    Unordered(HashMap<String, Value>),
}

impl Map {
    #[must_use]
    pub fn new(representation: MapRepresentation) -> Self {
        match representation {
            MapRepresentation::Ordered => Self::Ordered(IndexMap::new()),
            MapRepresentation::Unordered => Self::Unordered(HashMap::new()),
        }
    }

    #[must_use]
    pub fn representation(&self) -> MapRepresentation {
        match self {
            Self::Ordered(_) => MapRepresentation::Ordered,
            Self::Unordered(_) => MapRepresentation::Unordered,
        }
    }

    /// Insert a member. A repeated key replaces the earlier value; in an
    /// ordered map it keeps the earlier key's position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        match self {
            Self::Ordered(m) => m.insert(key, value),
            Self::Unordered(m) => m.insert(key, value),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Ordered(m) => m.get(key),
            Self::Unordered(m) => m.get(key),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(m) => m.len(),
            Self::Unordered(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over members; document order for [`Map::Ordered`].
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        match self {
            Self::Ordered(m) => Iter::Ordered(m.iter()),
            Self::Unordered(m) => Iter::Unordered(m.iter()),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`Map`].
pub enum Iter<'a> {
    Ordered(index_map::Iter<'a, String, Value>),
    Unordered(hash_map::Iter<'a, String, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a String, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Ordered(it) => it.next(),
            Self::Unordered(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Ordered(it) => it.size_hint(),
            Self::Unordered(it) => it.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(representation: MapRepresentation) -> Map {
        let mut m = Map::new(representation);
        m.insert("b".into(), Value::from(1));
        m.insert("a".into(), Value::from("x"));
        m
    }

    #[test]
    fn ordered_map_keeps_insertion_order() {
        let m = sample(MapRepresentation::Ordered);
        assert_eq!(m.keys().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn representations_compare_by_members() {
        let ordered = sample(MapRepresentation::Ordered);
        let unordered = sample(MapRepresentation::Unordered);
        assert_eq!(ordered, unordered);
        assert_eq!(unordered.representation(), MapRepresentation::Unordered);

        let mut other = sample(MapRepresentation::Ordered);
        other.insert("a".into(), Value::Null);
        assert_ne!(ordered, other);
    }

    #[test]
    fn duplicate_key_replaces_value_in_place() {
        let mut m = sample(MapRepresentation::Ordered);
        assert_eq!(m.insert("b".into(), Value::Null), Some(Value::from(1)));
        assert_eq!(m.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(m.get("b"), Some(&Value::Null));
    }

    #[test]
    fn accessors() {
        let v = Value::Object(sample(MapRepresentation::Unordered));
        assert!(v.is_object());
        assert_eq!(v.get("a").and_then(Value::as_str), Some("x"));
        assert_eq!(v.get("zzz"), None);
        assert!(Value::from(vec![Value::Null]).as_array().is_some());
    }
}
