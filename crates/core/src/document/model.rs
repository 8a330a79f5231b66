use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::DocumentIdentity;
use super::value::DocumentValue;

/// Field-name to value mapping for one fetched document, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument {
    fields: BTreeMap<String, DocumentValue>,
}

impl RawDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Returns `None` if `value` is not an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(
                map.into_iter()
                    .map(|(k, v)| (k, DocumentValue::from(v)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Look up a field. Explicit nulls read the same as absent keys.
    pub fn get(&self, field: &str) -> Option<&DocumentValue> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<DocumentValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style [`RawDocument::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<DocumentValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<DocumentValue> {
        self.fields.remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DocumentValue)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, DocumentValue)> for RawDocument {
    fn from_iter<I: IntoIterator<Item = (String, DocumentValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A document as returned by the store client: identity plus raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub identity: DocumentIdentity,
    pub data: RawDocument,
}

impl StoredDocument {
    pub fn new(identity: DocumentIdentity, data: RawDocument) -> Self {
        Self { identity, data }
    }
}
