//! Store error types.

use storefront_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend failed.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// Key not found.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// A conditional write lost against a concurrent writer.
    #[error("Version conflict on {key}: expected {expected}, found {found}")]
    VersionConflict {
        key: String,
        expected: u64,
        found: u64,
    },

    /// A create found the key already present.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Retries exhausted under contention.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// A domain rule rejected the mutation.
    #[error(transparent)]
    Domain(#[from] CommerceError),
}
