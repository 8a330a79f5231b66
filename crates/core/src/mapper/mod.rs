//! Typed document mapping.
//!
//! A [`DocumentModel`] declares its fields once in a [`Schema`], each with
//! an explicit [`FieldPolicy`]. [`map_document`] applies the schema to a raw
//! document and either returns a fully built record or the error for the
//! first field that could not be satisfied.

pub mod coerce;
pub mod error;
pub mod schema;

use crate::document::{DocumentIdentity, RawDocument, StoredDocument};

pub use coerce::FromValue;
pub use error::MappingError;
pub use schema::{FieldPolicy, FieldSpec, ResolvedFields, Schema};

/// A record type that can be built from a stored document.
pub trait DocumentModel: Sized {
    /// Collection the records are read from.
    const COLLECTION: &'static str;

    /// Field declarations, in evaluation order.
    fn schema() -> &'static Schema;

    /// Build the record from fields that already passed the schema.
    fn from_fields(
        identity: DocumentIdentity,
        fields: &ResolvedFields<'_>,
    ) -> Result<Self, MappingError>;
}

/// Map one raw document into a typed record.
///
/// Pure: no I/O, and `raw` is left untouched.
pub fn map_document<M: DocumentModel>(
    identity: DocumentIdentity,
    raw: &RawDocument,
) -> Result<M, MappingError> {
    let fields = M::schema().resolve(raw)?;
    M::from_fields(identity, &fields)
}

/// [`map_document`] over a stored document.
pub fn map_stored<M: DocumentModel>(doc: &StoredDocument) -> Result<M, MappingError> {
    map_document(doc.identity.clone(), &doc.data)
}
