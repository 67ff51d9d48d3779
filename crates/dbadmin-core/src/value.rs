//! Dynamically typed scalar carried in documents, field sets and predicates.

use base64::Engine;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One column value, independent of the table it came from.
///
/// Driver-native types without a dedicated variant (timestamps, numerics,
/// enums, ...) are carried as their text representation, or as raw bytes when
/// they have none.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl From<Value> for ScalarValue {
    /// Loose conversion used for request payloads.
    ///
    /// Integers that do not fit in an `i64` keep their exact digits as text;
    /// arrays and objects become their compact JSON text so they can still be
    /// bound against `json`/`jsonb`/array columns.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ScalarValue::Null,
            Value::Bool(b) => ScalarValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ScalarValue::Int(i)
                } else if n.is_u64() {
                    ScalarValue::Text(n.to_string())
                } else {
                    n.as_f64()
                        .map(ScalarValue::Float)
                        .unwrap_or_else(|| ScalarValue::Text(n.to_string()))
                }
            }
            Value::String(s) => ScalarValue::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => ScalarValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Int(n)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

impl Serialize for ScalarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScalarValue::Null => serializer.serialize_none(),
            ScalarValue::Bool(b) => serializer.serialize_bool(*b),
            ScalarValue::Int(n) => serializer.serialize_i64(*n),
            ScalarValue::Float(f) => serializer.serialize_f64(*f),
            ScalarValue::Text(s) => serializer.serialize_str(s),
            ScalarValue::Bytes(b) => serializer
                .serialize_str(&base64::engine::general_purpose::STANDARD.encode(b)),
        }
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ScalarValue::from)
    }
}
