//! In-memory implementation of the Storage trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence. An optional byte quota
//! reproduces the "storage full" failure of device-local storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::{Result, StorageError};
use crate::traits::Storage;

/// In-memory storage implementation.
///
/// All data is lost when the storage is dropped. Thread-safe via RwLock.
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    /// Maximum total size of keys plus values, in bytes.
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage with no quota.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create a storage that rejects writes once keys plus values would
    /// exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Create a storage pre-populated with `entries`, ignoring any quota.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: RwLock::new(items),
            quota: None,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes used by keys plus values.
    pub fn used_bytes(&self) -> usize {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        used_bytes(&items)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn used_bytes(items: &HashMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let replaced = items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let needed = used_bytes(&items) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    quota,
                });
            }
        }

        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = items.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.clear();
        Ok(())
    }
}
