//! Typed JSON layer over a [`KvBackend`].

use crate::kv::KvBackend;
use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Maximum attempts for an optimistic read-modify-write.
const MAX_UPDATE_RETRIES: u32 = 32;

/// Cloneable handle to a shared backend with automatic JSON serialization.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by a fresh [`MemoryBackend`](crate::MemoryBackend).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::MemoryBackend::new()))
    }

    /// Get a value. Returns `None` if the key doesn't exist.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key).await? {
            Some(versioned) => Ok(Some(serde_json::from_slice(&versioned.value)?)),
            None => Ok(None),
        }
    }

    /// Write a value only if the key is absent.
    pub async fn create<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.put(key, bytes, Some(0)).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.delete(key).await
    }

    /// Load every value under a prefix.
    ///
    /// Keys deleted between listing and reading are skipped.
    pub async fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        let mut values = Vec::new();
        for key in self.backend.keys(prefix).await? {
            if let Some(value) = self.get(&key).await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Read-modify-write an existing value with optimistic concurrency.
    ///
    /// `f` may run several times if other writers interleave; an error from
    /// `f` aborts without writing.
    pub async fn update<T, F>(&self, key: &str, f: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&mut T) -> Result<(), StoreError>,
    {
        self.modify(key, || None, f).await
    }

    /// Like [`update`](Self::update), starting from `init()` when the key
    /// is absent.
    pub async fn upsert<T, I, F>(&self, key: &str, init: I, f: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        I: Fn() -> T,
        F: FnMut(&mut T) -> Result<(), StoreError>,
    {
        self.modify(key, || Some(init()), f).await
    }

    async fn modify<T, I, F>(&self, key: &str, init: I, mut f: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        I: Fn() -> Option<T>,
        F: FnMut(&mut T) -> Result<(), StoreError>,
    {
        for attempt in 0..MAX_UPDATE_RETRIES {
            let (mut value, expected) = match self.backend.get(key).await? {
                Some(versioned) => (
                    serde_json::from_slice::<T>(&versioned.value)?,
                    versioned.version,
                ),
                None => match init() {
                    Some(value) => (value, 0),
                    None => return Err(StoreError::NotFound(key.to_string())),
                },
            };

            f(&mut value)?;

            let bytes = serde_json::to_vec(&value)?;
            match self.backend.put(key, bytes, Some(expected)).await {
                Ok(_) => return Ok(value),
                Err(StoreError::VersionConflict { .. }) | Err(StoreError::AlreadyExists(_)) => {
                    debug!(key, attempt, "concurrent modification, retrying");
                    tokio::task::yield_now().await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::ConcurrentModification(format!(
            "{}: max retries exceeded",
            key
        )))
    }
}
