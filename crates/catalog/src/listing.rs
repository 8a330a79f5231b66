use marche_core::document::{DocumentIdentity, StoredDocument};
use marche_core::mapper::{map_stored, DocumentModel, MappingError};
use marche_core::query::Query;

use crate::store::{DocumentStore, StoreError};

/// A fetched document that could not be mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub identity: DocumentIdentity,
    pub error: MappingError,
}

/// Result of mapping a batch: good records in fetch order, plus the
/// documents that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<M> {
    pub records: Vec<M>,
    pub rejected: Vec<Rejected>,
}

impl<M> Default for Listing<M> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Map every document, isolating failures so one malformed document does
/// not drop the rest of the batch.
pub fn map_batch<M: DocumentModel>(documents: &[StoredDocument]) -> Listing<M> {
    let mut listing = Listing::default();
    for doc in documents {
        match map_stored::<M>(doc) {
            Ok(record) => listing.records.push(record),
            Err(error) => {
                tracing::warn!(document = %doc.identity, %error, "Skipping malformed document");
                listing.rejected.push(Rejected {
                    identity: doc.identity.clone(),
                    error,
                });
            }
        }
    }
    tracing::debug!(
        collection = M::COLLECTION,
        mapped = listing.records.len(),
        rejected = listing.rejected.len(),
        "Mapped batch"
    );
    listing
}

/// Fetch `query` from the store and map the results.
///
/// Only a store failure fails the call; mapping failures land in
/// [`Listing::rejected`].
pub async fn list<M, S>(store: &S, query: &Query) -> Result<Listing<M>, StoreError>
where
    M: DocumentModel,
    S: DocumentStore + ?Sized,
{
    let documents = store.fetch(query).await?;
    Ok(map_batch(&documents))
}
