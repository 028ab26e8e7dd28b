//! Value representations for the mock record store.
//!
//! `Value` is the stored form of a field: scalars, nested records, references
//! to other records, or lists of any of those. A `Record` is an ordered map of
//! field name to `Value`.
//!
//! Field names starting with `$` are store-only metadata (`$id`, `$speciesId`)
//! that never appear on the schema.

use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix marking store-only metadata fields.
pub const META_PREFIX: char = '$';

/// Synthetic identifier field for records without a natural key.
pub const META_ID_FIELD: &str = "$id";

/// Check whether a field name is store-only metadata.
pub fn is_meta_field(name: &str) -> bool {
    name.starts_with(META_PREFIX)
}

/// Stored field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null / absent value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// String value (also used for ids and enum values)
    String(String),

    /// List of values
    List(Vec<Value>),

    /// Nested record
    Object(Record),

    /// Link to another stored record
    Ref(Reference),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as a nested record.
    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Self::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Try to get this value as a reference.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Get the id this value carries as a key: the string itself, or the
    /// local id of a reference.
    pub fn key_id(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Ref(r) => Some(&r.id),
            _ => None,
        }
    }

    /// Check whether this value carries `id` as a key, directly or as an
    /// element of a list.
    pub fn links_to(&self, id: &str) -> bool {
        match self {
            Self::List(items) => items.iter().any(|item| item.key_id() == Some(id)),
            other => other.key_id() == Some(id),
        }
    }

    /// Convert to a JSON value.
    ///
    /// References become `{"type": ..., "id": ...}` objects; non-finite
    /// floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Object(record) => record.to_json(),
            Self::Ref(r) => serde_json::json!({ "type": r.type_name, "id": r.id }),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Self::Ref(r)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Object(record)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Ordered field map of a stored record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Check whether a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a field.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Merge fields from `other`.
    ///
    /// Existing fields are kept unless `override_existing` is set.
    pub fn merge(&mut self, other: Record, override_existing: bool) {
        for (field, value) in other.0 {
            if override_existing || !self.0.contains_key(&field) {
                self.0.insert(field, value);
            }
        }
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over field names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of fields, metadata included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a JSON object, dropping metadata fields.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .filter(|(k, _)| !is_meta_field(k))
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_i64(), Some(42));
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.as_str(), None);
    }

    #[test]
    fn test_key_id_and_links() {
        let by_string = Value::from("c1");
        let by_ref = Value::Ref(Reference::new("Customer", "c1"));
        let many = Value::List(vec![Value::from("c0"), by_ref.clone()]);

        assert_eq!(by_string.key_id(), Some("c1"));
        assert_eq!(by_ref.key_id(), Some("c1"));
        assert!(many.links_to("c1"));
        assert!(!many.links_to("c2"));
        assert!(!Value::Int(1).links_to("1"));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({
            "name": "Luke",
            "height": 172,
            "mass": 77.5,
            "films": ["f1", "f2"],
            "homeworld": null
        }));

        let record = value.as_object().unwrap();
        assert_eq!(record.get("name"), Some(&Value::from("Luke")));
        assert_eq!(record.get("height"), Some(&Value::Int(172)));
        assert_eq!(record.get("mass"), Some(&Value::Float(77.5)));
        assert_eq!(record.get("films"), Some(&Value::from(vec!["f1", "f2"])));
        assert_eq!(record.get("homeworld"), Some(&Value::Null));
    }

    #[test]
    fn test_to_json_hides_meta_fields() {
        let record = Record::new()
            .with("$id", "Film:1")
            .with("title", "A New Hope")
            .with("director", Value::Ref(Reference::new("Person", "p1")));

        assert_eq!(
            record.to_json(),
            json!({
                "title": "A New Hope",
                "director": {"type": "Person", "id": "p1"}
            })
        );
    }

    #[test]
    fn test_merge_prefers_existing() {
        let mut record = Record::new().with("name", "Luke");
        record.merge(Record::new().with("name", "Leia").with("height", 150i64), false);
        assert_eq!(record.get("name"), Some(&Value::from("Luke")));
        assert_eq!(record.get("height"), Some(&Value::Int(150)));

        record.merge(Record::new().with("name", "Leia"), true);
        assert_eq!(record.get("name"), Some(&Value::from("Leia")));
    }

    #[test]
    fn test_yaml_deserialize() {
        let record: Record = serde_yaml::from_str(
            r#"
id: f1
episode: 4
rating: 8.6
released: true
tags: [classic, space]
"#,
        )
        .unwrap();

        assert_eq!(record.get("id"), Some(&Value::from("f1")));
        assert_eq!(record.get("episode"), Some(&Value::Int(4)));
        assert_eq!(record.get("rating"), Some(&Value::Float(8.6)));
        assert_eq!(record.get("released"), Some(&Value::Bool(true)));
        assert_eq!(
            record.get("tags"),
            Some(&Value::from(vec!["classic", "space"]))
        );
    }

    #[test]
    fn test_meta_fields() {
        assert!(is_meta_field(META_ID_FIELD));
        assert!(is_meta_field("$speciesId"));
        assert!(!is_meta_field("species"));
    }
}
