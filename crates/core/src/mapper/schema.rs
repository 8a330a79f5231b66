use crate::document::{DocumentValue, RawDocument, ValueKind};

use super::coerce::FromValue;
use super::error::MappingError;

/// How a field reacts to being absent or holding the wrong type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Absent or mismatched fails the mapping.
    Required,
    /// Absent uses the default; mismatched fails the mapping.
    OptionalWithDefault,
    /// Absent or mismatched uses the default.
    BestEffort,
}

/// One declared field of a document schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub policy: FieldPolicy,
    pub expected: ValueKind,
    accepts: fn(&DocumentValue) -> bool,
}

impl FieldSpec {
    pub fn new<T: FromValue>(name: &'static str, policy: FieldPolicy) -> Self {
        Self {
            name,
            policy,
            expected: T::KIND,
            accepts: T::accepts,
        }
    }

    pub fn accepts(&self, value: &DocumentValue) -> bool {
        (self.accepts)(value)
    }
}

/// Ordered field declarations for one record type.
///
/// Declaration order is evaluation order: when several fields are invalid,
/// the first declared one is reported.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<T: FromValue>(mut self, name: &'static str) -> Self {
        self.fields.push(FieldSpec::new::<T>(name, FieldPolicy::Required));
        self
    }

    pub fn optional<T: FromValue>(mut self, name: &'static str) -> Self {
        self.fields
            .push(FieldSpec::new::<T>(name, FieldPolicy::OptionalWithDefault));
        self
    }

    pub fn best_effort<T: FromValue>(mut self, name: &'static str) -> Self {
        self.fields.push(FieldSpec::new::<T>(name, FieldPolicy::BestEffort));
        self
    }

    /// Apply every field policy in declared order, stopping at the first
    /// failure. Keys not declared in the schema are ignored.
    pub fn resolve<'a>(&self, raw: &'a RawDocument) -> Result<ResolvedFields<'a>, MappingError> {
        let mut entries = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let resolved = match (raw.get(spec.name), spec.policy) {
                (None, FieldPolicy::Required) => {
                    return Err(MappingError::MissingField { field: spec.name })
                }
                (None, _) => Resolved::Default,
                (Some(value), _) if spec.accepts(value) => Resolved::Value(value),
                (Some(_), FieldPolicy::BestEffort) => Resolved::Default,
                (Some(value), _) => {
                    return Err(MappingError::TypeMismatch {
                        field: spec.name,
                        expected: spec.expected,
                        actual: value.clone(),
                    })
                }
            };
            entries.push((spec.name, resolved));
        }
        Ok(ResolvedFields { entries })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolved<'a> {
    Value(&'a DocumentValue),
    Default,
}

/// Field values that passed every policy, ready for typed extraction.
#[derive(Debug, Clone)]
pub struct ResolvedFields<'a> {
    entries: Vec<(&'static str, Resolved<'a>)>,
}

impl<'a> ResolvedFields<'a> {
    fn lookup(&self, name: &'static str) -> Result<Resolved<'a>, MappingError> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, resolved)| *resolved)
            .ok_or(MappingError::UndeclaredField(name))
    }

    /// Read a field that has no default.
    pub fn value<T: FromValue>(&self, name: &'static str) -> Result<T, MappingError> {
        match self.lookup(name)? {
            Resolved::Value(value) => coerce(name, value),
            Resolved::Default => Err(MappingError::MissingField { field: name }),
        }
    }

    /// Read a field, falling back to `T::default()` when the schema resolved
    /// it to its default.
    pub fn value_or_default<T: FromValue + Default>(
        &self,
        name: &'static str,
    ) -> Result<T, MappingError> {
        match self.lookup(name)? {
            Resolved::Value(value) => coerce(name, value),
            Resolved::Default => Ok(T::default()),
        }
    }

    /// Whether the field fell back to its default.
    pub fn is_default(&self, name: &'static str) -> bool {
        matches!(self.lookup(name), Ok(Resolved::Default))
    }
}

fn coerce<T: FromValue>(name: &'static str, value: &DocumentValue) -> Result<T, MappingError> {
    T::from_value(value).ok_or_else(|| MappingError::TypeMismatch {
        field: name,
        expected: T::KIND,
        actual: value.clone(),
    })
}
