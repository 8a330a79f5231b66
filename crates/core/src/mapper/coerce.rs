//! Per-type coercion from dynamic document values.
//!
//! Coercions are strict: integers are never parsed from strings or floats,
//! and timestamps must pass their own decoding rule.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::document::{DocumentValue, Timestamp, ValueKind};

/// A Rust type that can be read out of a [`DocumentValue`].
pub trait FromValue: Sized {
    /// The value kind reported in type mismatch errors.
    const KIND: ValueKind;

    /// Coerce `value`, or `None` if it does not fit this type.
    fn from_value(value: &DocumentValue) -> Option<Self>;

    fn accepts(value: &DocumentValue) -> bool {
        Self::from_value(value).is_some()
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Floats accept integers, since stores drop the fraction of whole numbers.
impl FromValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Float(n) => Some(*n),
            DocumentValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for Timestamp {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Timestamp(ts) if ts.date_value().is_some() => Some(*ts),
            _ => None,
        }
    }
}

impl FromValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Timestamp(ts) => ts.date_value(),
            _ => None,
        }
    }
}

impl FromValue for BTreeMap<String, DocumentValue> {
    const KIND: ValueKind = ValueKind::Map;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Map(map) => Some(map.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<DocumentValue> {
    const KIND: ValueKind = ValueKind::Array;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        match value {
            DocumentValue::Array(items) => Some(items.clone()),
            _ => None,
        }
    }
}

/// A present value must still fit `T`; absence is handled by the schema.
impl<T: FromValue> FromValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_value(value: &DocumentValue) -> Option<Self> {
        T::from_value(value).map(Some)
    }
}
