//! Documents, field sets and predicate maps.

use crate::value::ScalarValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Column → value payload for INSERT and UPDATE. Sorted by column name.
pub type FieldSet = BTreeMap<String, ScalarValue>;

/// Equality-only, AND-combined row filter. Sorted by column name.
pub type PredicateMap = BTreeMap<String, ScalarValue>;

/// One row as an ordered column → value mapping.
///
/// Column order is the result-set order. A NULL column is present with
/// [`ScalarValue::Null`]; an absent key means the column was not selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: Vec<(String, ScalarValue)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace a column. A replaced column keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: ScalarValue) -> Option<ScalarValue> {
        let name = name.into();
        if let Some((_, existing)) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(existing, value));
        }
        self.fields.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, ScalarValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, ScalarValue)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (name, value) in iter {
            doc.insert(name, value);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, ScalarValue);
    type IntoIter = std::vec::IntoIter<(String, ScalarValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of column values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Document, A::Error> {
                let mut doc = Document::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, ScalarValue>()? {
                    doc.insert(name, value);
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// Turn a document received as a request payload into a field set.
///
/// Values are moved across untouched; binding and the database's own casts
/// perform any type conversion later.
pub fn to_field_set(document: Document) -> FieldSet {
    document.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_preserves_column_order() {
        let doc: Document = vec![
            ("zeta".to_string(), ScalarValue::Int(1)),
            ("alpha".to_string(), ScalarValue::Null),
        ]
        .into_iter()
        .collect();

        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":null}"#);
    }

    #[test]
    fn test_deserialization_preserves_order_and_nulls() {
        let doc: Document = serde_json::from_str(r#"{"b": null, "a": "x"}"#).unwrap();
        let names: Vec<&str> = doc.column_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(doc.get("b"), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut doc = Document::new();
        doc.insert("a", ScalarValue::Int(1));
        doc.insert("b", ScalarValue::Int(2));
        let old = doc.insert("a", ScalarValue::Int(3));
        assert_eq!(old, Some(ScalarValue::Int(1)));
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"a": 3, "b": 2}));
        assert_eq!(doc.column_names().next(), Some("a"));
    }

    #[test]
    fn test_to_field_set_keeps_loose_values() {
        let doc: Document = serde_json::from_str(r#"{"id": "2", "tags": ["x"]}"#).unwrap();
        let fields = to_field_set(doc);
        assert_eq!(fields.get("id"), Some(&ScalarValue::Text("2".into())));
        assert_eq!(fields.get("tags"), Some(&ScalarValue::Text(r#"["x"]"#.into())));
    }
}
