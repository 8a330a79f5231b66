//! Catalog plumbing around the core mapper: the document-store client,
//! batch listing with per-document failure isolation, and the sectioned
//! items-list store that backs the items screen.

pub mod config;
pub mod listing;
pub mod sections;
pub mod store;

pub use config::{CatalogConfig, ConfigError};
pub use listing::{list, map_batch, Listing, Rejected};
pub use sections::ItemsListStore;
pub use store::{DocumentStore, MemoryStore, StoreError};
