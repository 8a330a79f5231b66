use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const NANOS_PER_SECOND: i32 = 1_000_000_000;
const SECONDS_KEY: &str = "_seconds";
const NANOS_KEY: &str = "_nanoseconds";

/// Store-native instant: seconds since the Unix epoch plus a nanosecond part.
///
/// Serialized the way document exports write it:
/// `{"_seconds": 1562544000, "_nanoseconds": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds")]
    pub nanoseconds: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: i32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Decode into a date/time value.
    ///
    /// Returns `None` when the nanosecond part is outside `[0, 1e9)` or the
    /// instant is outside the range `chrono` can represent.
    pub fn date_value(&self) -> Option<DateTime<Utc>> {
        if !(0..NANOS_PER_SECOND).contains(&self.nanoseconds) {
            return None;
        }
        DateTime::from_timestamp(self.seconds, self.nanoseconds as u32)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanoseconds: value.timestamp_subsec_nanos() as i32,
        }
    }
}

/// The kinds of value a document field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Map,
    Array,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Map => "map",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A dynamically typed field value as delivered by the document store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(Timestamp),
    Map(BTreeMap<String, DocumentValue>),
    Array(Vec<DocumentValue>),
    Null,
}

impl DocumentValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DocumentValue::String(_) => ValueKind::String,
            DocumentValue::Integer(_) => ValueKind::Integer,
            DocumentValue::Float(_) => ValueKind::Float,
            DocumentValue::Boolean(_) => ValueKind::Boolean,
            DocumentValue::Timestamp(_) => ValueKind::Timestamp,
            DocumentValue::Map(_) => ValueKind::Map,
            DocumentValue::Array(_) => ValueKind::Array,
            DocumentValue::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }
}

impl fmt::Display for DocumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "<{}>", self.kind()),
        }
    }
}

/// Recognize the exported timestamp shape: exactly `_seconds` and
/// `_nanoseconds`, both integers.
fn timestamp_from_object(map: &serde_json::Map<String, Value>) -> Option<Timestamp> {
    if map.len() != 2 {
        return None;
    }
    let seconds = map.get(SECONDS_KEY)?.as_i64()?;
    let nanoseconds = i32::try_from(map.get(NANOS_KEY)?.as_i64()?).ok()?;
    Some(Timestamp::new(seconds, nanoseconds))
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocumentValue::Null,
            Value::Bool(b) => DocumentValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DocumentValue::Integer(i),
                None => DocumentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => DocumentValue::String(s),
            Value::Array(items) => {
                DocumentValue::Array(items.into_iter().map(DocumentValue::from).collect())
            }
            Value::Object(map) => match timestamp_from_object(&map) {
                Some(ts) => DocumentValue::Timestamp(ts),
                None => DocumentValue::Map(
                    map.into_iter()
                        .map(|(k, v)| (k, DocumentValue::from(v)))
                        .collect(),
                ),
            },
        }
    }
}

impl<'de> Deserialize<'de> for DocumentValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(DocumentValue::from)
    }
}

impl From<&str> for DocumentValue {
    fn from(value: &str) -> Self {
        DocumentValue::String(value.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(value: String) -> Self {
        DocumentValue::String(value)
    }
}

impl From<i64> for DocumentValue {
    fn from(value: i64) -> Self {
        DocumentValue::Integer(value)
    }
}

impl From<f64> for DocumentValue {
    fn from(value: f64) -> Self {
        DocumentValue::Float(value)
    }
}

impl From<bool> for DocumentValue {
    fn from(value: bool) -> Self {
        DocumentValue::Boolean(value)
    }
}

impl From<Timestamp> for DocumentValue {
    fn from(value: Timestamp) -> Self {
        DocumentValue::Timestamp(value)
    }
}
