use thiserror::Error;

use crate::document::{DocumentValue, ValueKind};

/// Why a raw document could not be mapped into a typed record.
///
/// Always names the first field, in schema order, that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` expected {expected}, found {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: ValueKind,
        actual: DocumentValue,
    },

    #[error("field `{0}` is not declared in the schema")]
    UndeclaredField(&'static str),
}

impl MappingError {
    /// The offending field name.
    pub fn field(&self) -> &'static str {
        match self {
            MappingError::MissingField { field }
            | MappingError::TypeMismatch { field, .. }
            | MappingError::UndeclaredField(field) => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = MappingError::TypeMismatch {
            field: "price",
            expected: ValueKind::Integer,
            actual: DocumentValue::from("480"),
        };
        assert_eq!(err.to_string(), "field `price` expected integer, found \"480\"");
        assert_eq!(err.field(), "price");

        let err = MappingError::MissingField { field: "title" };
        assert_eq!(err.to_string(), "missing required field `title`");
    }
}
