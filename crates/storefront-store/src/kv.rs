//! Versioned key-value backends.

use crate::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A stored value and its version.
///
/// Versions start at 1 and grow by one on every write to the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Raw byte store with compare-and-swap writes.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError>;

    /// Write `value` under `key` and return the new version.
    ///
    /// With `expected = Some(v)` the write only happens if the current
    /// version is `v`; `Some(0)` means the key must not exist. `None`
    /// writes unconditionally.
    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Option<u64>,
    ) -> Result<u64, StoreError>;

    /// Delete a key. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys starting with `prefix`, sorted.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Versioned>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Option<u64>,
    ) -> Result<u64, StoreError> {
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map(|v| v.version).unwrap_or(0);
        if let Some(expected) = expected {
            if expected != current {
                if expected == 0 {
                    return Err(StoreError::AlreadyExists(key.to_string()));
                }
                return Err(StoreError::VersionConflict {
                    key: key.to_string(),
                    expected,
                    found: current,
                });
            }
        }
        let version = current + 1;
        entries.insert(key.to_string(), Versioned { value, version });
        Ok(version)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Build a namespaced store key.
///
/// ```
/// use storefront_store::store_key;
/// assert_eq!(store_key!("cart", "user-1"), "cart:user-1");
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let kv = MemoryBackend::new();
        let version = kv.put("a", b"1".to_vec(), None).await.unwrap();
        assert_eq!(version, 1);
        let got = kv.get("a").await.unwrap().unwrap();
        assert_eq!(got.value, b"1".to_vec());
        assert_eq!(got.version, 1);
    }

    #[tokio::test]
    async fn test_create_only() {
        let kv = MemoryBackend::new();
        kv.put("a", b"1".to_vec(), Some(0)).await.unwrap();
        let result = kv.put("a", b"2".to_vec(), Some(0)).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let kv = MemoryBackend::new();
        kv.put("a", b"1".to_vec(), None).await.unwrap();
        kv.put("a", b"2".to_vec(), Some(1)).await.unwrap();
        let result = kv.put("a", b"3".to_vec(), Some(1)).await;
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 1,
                found: 2,
                ..
            })
        ));
        assert_eq!(kv.get("a").await.unwrap().unwrap().value, b"2".to_vec());
    }

    #[tokio::test]
    async fn test_keys_by_prefix() {
        let kv = MemoryBackend::new();
        kv.put("order:2", Vec::new(), None).await.unwrap();
        kv.put("order:1", Vec::new(), None).await.unwrap();
        kv.put("cart:1", Vec::new(), None).await.unwrap();
        assert_eq!(kv.keys("order:").await.unwrap(), vec!["order:1", "order:2"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let kv = MemoryBackend::new();
        kv.put("a", Vec::new(), None).await.unwrap();
        assert!(kv.delete("a").await.unwrap());
        assert!(!kv.delete("a").await.unwrap());
        assert!(kv.get("a").await.unwrap().is_none());
    }

    #[test]
    fn test_store_key_macro() {
        assert_eq!(store_key!("order", "abc"), "order:abc");
        assert_eq!(store_key!("user", "email", "a@b.in"), "user:email:a@b.in");
    }
}
