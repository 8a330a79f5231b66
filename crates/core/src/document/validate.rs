/// Document path validation.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("document path cannot be empty")]
    EmptyPath,
    #[error("document path `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("document path `{0}` must have an even number of segments")]
    OddSegments(String),
    #[error("collection path `{0}` must have an odd number of segments")]
    EvenCollectionSegments(String),
    #[error("document id `{0}` must be a single non-empty segment")]
    InvalidId(String),
}

/// Split a slash-separated path into its segments, rejecting empty ones.
pub fn path_segments(path: &str) -> Result<Vec<&str>, IdentityError> {
    if path.is_empty() {
        return Err(IdentityError::EmptyPath);
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(IdentityError::EmptySegment(path.to_string()));
    }
    Ok(segments)
}

/// Validate that `path` names a collection: `items`, `shops/s1/items`.
pub fn validate_collection_path(path: &str) -> Result<(), IdentityError> {
    let segments = path_segments(path)?;
    if segments.len() % 2 == 0 {
        return Err(IdentityError::EvenCollectionSegments(path.to_string()));
    }
    Ok(())
}
