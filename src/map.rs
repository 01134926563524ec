//! Ordered plain records.
//!
//! [`RecordMap`] is both the plain record a host collection hands out and the
//! output row the format pipeline writes display strings into. Attributes keep
//! their insertion order, so formatted rows serialize with a stable key order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Attribute name to value, in insertion order.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{RecordMap, Value};
///
/// let mut row = RecordMap::new();
/// row.insert("id".to_string(), Value::from(7));
/// row.insert("name".to_string(), Value::from("Alice"));
///
/// let keys: Vec<_> = row.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["id", "name"]);
/// assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordMap(IndexMap<String, Value>);

impl RecordMap {
    #[must_use]
    pub fn new() -> Self {
        RecordMap(IndexMap::new())
    }

    /// Sets an attribute, returning its previous value.
    ///
    /// Overwriting an attribute keeps its position, so a formatted row lists its
    /// columns where the raw record had them.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attribute names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Attribute values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }
}

impl IntoIterator for RecordMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for RecordMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        RecordMap(IndexMap::from_iter(iter))
    }
}

impl<'a> FromIterator<(&'a str, Value)> for RecordMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, Value)>>(iter: T) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl Extend<(String, Value)> for RecordMap {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_position() {
        let mut map: RecordMap = [("a", Value::from(1)), ("b", Value::from(2))]
            .into_iter()
            .collect();
        map.insert("a".to_string(), Value::from("one"));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::from("one")));
    }

    #[test]
    fn test_extend_appends_new_and_overwrites_existing() {
        let mut map: RecordMap = [("id", Value::from(1))].into_iter().collect();
        let other: RecordMap = [("name", Value::from("x")), ("id", Value::from(2))]
            .into_iter()
            .collect();
        map.extend(other);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("id"), Some(&Value::from(2)));
        let values: Vec<_> = map.values().cloned().collect();
        assert_eq!(values, [Value::from(2), Value::from("x")]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let map: RecordMap = [("id", Value::from(7)), ("name", Value::from("x"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"x"}"#);

        let back: RecordMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert!(RecordMap::new().is_empty());
    }
}
