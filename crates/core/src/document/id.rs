/// Document identity parsing.
///
/// Documents are addressed by slash-separated paths that alternate between
/// collection and document segments:
/// - Top level: `items/{id}`
/// - Nested: `shops/{shopId}/items/{id}`
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validate::{path_segments, validate_collection_path, IdentityError};

/// Identifier plus collection path of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentIdentity {
    collection: String,
    id: String,
}

impl DocumentIdentity {
    /// Build an identity from a collection path and a document id.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self, IdentityError> {
        let collection = collection.into();
        let id = id.into();
        validate_collection_path(&collection)?;
        if id.is_empty() || id.contains('/') {
            return Err(IdentityError::InvalidId(id));
        }
        Ok(Self { collection, id })
    }

    /// Parse a full document path such as `shops/s1/items/abc`.
    pub fn parse(path: &str) -> Result<Self, IdentityError> {
        let segments = path_segments(path)?;
        if segments.len() % 2 != 0 {
            return Err(IdentityError::OddSegments(path.to_string()));
        }
        match path.rsplit_once('/') {
            Some((collection, id)) => Ok(Self {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            None => Err(IdentityError::OddSegments(path.to_string())),
        }
    }

    /// The document id (last path segment).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The collection path the document lives in.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The full document path.
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }

    /// The parent document path for sub-collections, `None` at the top level.
    pub fn parent(&self) -> Option<&str> {
        self.collection.rsplit_once('/').map(|(parent, _)| parent)
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

impl FromStr for DocumentIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Self::parse(&path).map_err(serde::de::Error::custom)
    }
}
