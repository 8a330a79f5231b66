use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use marche_core::document::{DocumentIdentity, IdentityError, RawDocument, StoredDocument};
use marche_core::query::{eval, Query};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid fixture: {0}")]
    Fixture(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Client side of a remote document store.
pub trait DocumentStore: Send + Sync {
    /// Run `query` and return the matching documents in query order.
    fn fetch(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;
}

/// Document store held in memory, evaluated with the core query evaluator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocumentIdentity, RawDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a fixture of shape
    /// `{ "<collection>": { "<id>": { ...fields } } }`.
    pub fn from_fixture(fixture: Value) -> Result<Self, StoreError> {
        let Value::Object(collections) = fixture else {
            return Err(StoreError::Fixture("top level must be an object".into()));
        };

        let mut documents = BTreeMap::new();
        for (collection, docs) in collections {
            let Value::Object(docs) = docs else {
                return Err(StoreError::Fixture(format!(
                    "collection `{collection}` must be an object"
                )));
            };
            for (id, fields) in docs {
                let identity = DocumentIdentity::new(collection.as_str(), id)?;
                let data = RawDocument::from_json(fields).ok_or_else(|| {
                    StoreError::Fixture(format!("document `{identity}` must be an object"))
                })?;
                documents.insert(identity, data);
            }
        }

        tracing::debug!(documents = documents.len(), "Loaded fixture");
        Ok(Self {
            documents: RwLock::new(documents),
        })
    }

    /// Read and parse a fixture file.
    pub async fn load_fixture(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_fixture(serde_json::from_str(&text)?)
    }

    /// Create or overwrite a document.
    pub async fn set(&self, identity: DocumentIdentity, data: RawDocument) {
        self.documents.write().await.insert(identity, data);
    }

    /// Add a document under a generated id.
    pub async fn add(
        &self,
        collection: &str,
        data: RawDocument,
    ) -> Result<DocumentIdentity, StoreError> {
        let identity = DocumentIdentity::new(collection, Uuid::new_v4().simple().to_string())?;
        self.set(identity.clone(), data).await;
        Ok(identity)
    }

    pub async fn remove(&self, identity: &DocumentIdentity) -> Option<RawDocument> {
        self.documents.write().await.remove(identity)
    }

    pub async fn get(&self, identity: &DocumentIdentity) -> Option<RawDocument> {
        self.documents.read().await.get(identity).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let documents = self.documents.read().await;
        let snapshot = documents
            .iter()
            .map(|(identity, data)| StoredDocument::new(identity.clone(), data.clone()));
        let result = eval::apply(query, snapshot);
        tracing::debug!(%query, matched = result.len(), "Fetched documents");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marche_core::document::DocumentValue;
    use serde_json::json;

    #[test]
    fn fixture_builds_identities() {
        let store = MemoryStore::from_fixture(json!({
            "items": {"a": {"title": "A"}},
            "shops/s1/items": {"b": {"title": "B"}},
        }))
        .unwrap();
        let documents = store.documents.try_read().unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.contains_key(&DocumentIdentity::parse("items/a").unwrap()));
        assert!(documents.contains_key(&DocumentIdentity::parse("shops/s1/items/b").unwrap()));
    }

    #[test]
    fn fixture_rejects_bad_shapes() {
        assert!(matches!(
            MemoryStore::from_fixture(json!([])),
            Err(StoreError::Fixture(_))
        ));
        assert!(matches!(
            MemoryStore::from_fixture(json!({"items": {"a": 1}})),
            Err(StoreError::Fixture(_))
        ));
        assert!(matches!(
            MemoryStore::from_fixture(json!({"shops/s1": {"a": {}}})),
            Err(StoreError::Identity(_))
        ));
    }

    #[tokio::test]
    async fn add_generates_ids() {
        let store = MemoryStore::new();
        let a = store
            .add("items", RawDocument::new().with("title", "A"))
            .await
            .unwrap();
        let b = store.add("items", RawDocument::new()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.collection(), "items");
        assert_eq!(store.len().await, 2);
        assert_eq!(
            store.get(&a).await.unwrap().get("title"),
            Some(&DocumentValue::from("A"))
        );

        assert!(store.remove(&a).await.is_some());
        assert!(store.get(&a).await.is_none());
    }

    #[tokio::test]
    async fn fetch_applies_query() {
        let store = MemoryStore::from_fixture(json!({
            "items": {
                "a": {"isPublished": true, "price": 100},
                "b": {"isPublished": false, "price": 300},
                "c": {"isPublished": true, "price": 200},
            },
        }))
        .unwrap();
        let query = Query::collection("items")
            .where_eq("isPublished", true)
            .order_by("price", marche_core::query::Direction::Desc);
        let ids: Vec<String> = store
            .fetch(&query)
            .await
            .unwrap()
            .iter()
            .map(|d| d.identity.id().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn load_fixture_reports_missing_file() {
        let err = MemoryStore::load_fixture("/nonexistent/fixture.json")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
