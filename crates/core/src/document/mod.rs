pub mod id;
pub mod model;
pub mod validate;
pub mod value;

pub use id::DocumentIdentity;
pub use model::{RawDocument, StoredDocument};
pub use validate::IdentityError;
pub use value::{DocumentValue, Timestamp, ValueKind};
