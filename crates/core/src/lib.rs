//! Core types for the marketplace catalog: document identities and values,
//! the typed document mapper, collection queries and catalog events.

pub mod document;
pub mod entity;
pub mod events;
pub mod mapper;
pub mod query;

pub use document::{DocumentIdentity, DocumentValue, RawDocument, StoredDocument, Timestamp};
pub use entity::Item;
pub use mapper::{map_document, DocumentModel, MappingError};
pub use query::Query;
