use std::collections::HashMap;
use std::sync::Arc;

use marche_core::entity::Item;
use marche_core::events::{CatalogEvent, EventBus, Section};
use marche_core::query::Query;
use tokio::sync::{broadcast, RwLock};

use crate::listing::list;
use crate::store::{DocumentStore, StoreError};

/// Backing store for the items screen: one item list per [`Section`],
/// each filled from its own query.
///
/// Cloning is cheap; clones share sections and the event bus.
pub struct ItemsListStore<S> {
    inner: Arc<InnerState<S>>,
}

struct InnerState<S> {
    store: Arc<S>,
    event_bus: EventBus,
    queries: HashMap<Section, Query>,
    sections: RwLock<HashMap<Section, Vec<Item>>>,
}

impl<S> Clone for ItemsListStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DocumentStore> ItemsListStore<S> {
    pub fn new(
        store: Arc<S>,
        event_bus: EventBus,
        recommended: Query,
        hot_ranking: Query,
    ) -> Self {
        let queries = HashMap::from([
            (Section::Recommended, recommended),
            (Section::HotRanking, hot_ranking),
        ]);
        Self {
            inner: Arc::new(InnerState {
                store,
                event_bus,
                queries,
                sections: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Refetch one section and replace its contents.
    ///
    /// On success publishes [`CatalogEvent::SectionReloaded`] and returns
    /// the new item count. On a store failure the previous contents stay
    /// and [`CatalogEvent::LoadFailed`] is published.
    pub async fn reload(&self, section: Section) -> Result<usize, StoreError> {
        let query = &self.inner.queries[&section];
        match list::<Item, S>(&self.inner.store, query).await {
            Ok(listing) => {
                let count = listing.records.len();
                self.inner
                    .sections
                    .write()
                    .await
                    .insert(section, listing.records);
                tracing::info!(
                    ?section,
                    index = section.index(),
                    count,
                    skipped = listing.rejected.len(),
                    "Section reloaded"
                );
                self.inner
                    .event_bus
                    .publish(CatalogEvent::SectionReloaded { section, count });
                Ok(count)
            }
            Err(err) => {
                tracing::error!(?section, error = %err, "Section reload failed");
                self.inner.event_bus.publish(CatalogEvent::LoadFailed {
                    section,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Reload every section in display order, stopping at the first failure.
    pub async fn reload_all(&self) -> Result<(), StoreError> {
        for section in Section::ALL {
            self.reload(section).await?;
        }
        Ok(())
    }
}

impl<S> ItemsListStore<S> {
    /// Current contents of a section; empty until its first reload.
    pub async fn items(&self, section: Section) -> Vec<Item> {
        self.inner
            .sections
            .read()
            .await
            .get(&section)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn count(&self, section: Section) -> usize {
        self.inner
            .sections
            .read()
            .await
            .get(&section)
            .map_or(0, Vec::len)
    }

    /// Pick the item at `index` in a section.
    ///
    /// Publishes [`CatalogEvent::ItemSelected`] for the picked item. An index
    /// past the end of the section selects nothing.
    pub async fn select(&self, section: Section, index: usize) -> Option<Item> {
        let item = self
            .inner
            .sections
            .read()
            .await
            .get(&section)
            .and_then(|items| items.get(index))
            .cloned()?;
        tracing::debug!(?section, index, identity = %item.identity, "Item selected");
        self.inner.event_bus.publish(CatalogEvent::ItemSelected {
            section,
            identity: item.identity.clone(),
        });
        Some(item)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.inner.event_bus.subscribe()
    }
}
