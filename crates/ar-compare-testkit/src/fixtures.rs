//! Test fixtures: storages with observable or controllable behavior.
//!
//! Each wraps a [`MemoryStorage`] and changes one thing about it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use ar_compare_store::{MemoryStorage, Result, Storage, StorageError};

/// The slot the comparison store uses by default.
pub const STORAGE_KEY: &str = "ar-compare-comparison";

/// A persisted document with one item, `"saved-product"` at position 0.
pub const SAVED_PRODUCT_PAYLOAD: &str =
    r#"{"items":[{"productId":"saved-product","position":0}],"maxItems":4}"#;

/// A storage that records every write.
pub struct RecordingStorage {
    inner: MemoryStorage,
    writes: Mutex<Vec<(String, String)>>,
    reads: AtomicUsize,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::wrap(MemoryStorage::new())
    }

    /// Start with `value` already stored under [`STORAGE_KEY`].
    pub fn with_saved(value: &str) -> Self {
        Self::wrap(MemoryStorage::with_entries([(STORAGE_KEY, value)]))
    }

    pub fn wrap(inner: MemoryStorage) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Every `(key, value)` passed to `set_item`, in call order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_write(&self) -> Option<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// The underlying storage, for direct inspection.
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

impl Default for RecordingStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_owned(), value.to_owned()));
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.inner.remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}

/// A storage on which every call fails, as when device storage is disabled.
#[derive(Default)]
pub struct FailingStorage {
    attempts: AtomicUsize,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls made so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail<T>(&self, op: &str) -> Result<T> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable(format!("{} refused: storage disabled", op)))
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn get_item(&self, _key: &str) -> Result<Option<String>> {
        self.fail("get_item")
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        self.fail("set_item")
    }

    async fn remove_item(&self, _key: &str) -> Result<()> {
        self.fail("remove_item")
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.fail("keys")
    }

    async fn clear(&self) -> Result<()> {
        self.fail("clear")
    }
}

/// A storage whose reads wait until [`open`](GatedStorage::open) is called.
///
/// Holds the comparison store's hydration back so tests can act while the
/// store is still unhydrated, for as long as they need.
pub struct GatedStorage {
    inner: MemoryStorage,
    gate: Semaphore,
}

impl GatedStorage {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
        }
    }

    /// Start with `value` already stored under [`STORAGE_KEY`].
    pub fn with_saved(value: &str) -> Self {
        Self::new(MemoryStorage::with_entries([(STORAGE_KEY, value)]))
    }

    /// Let pending and future reads through.
    pub fn open(&self) {
        if self.gate.available_permits() == 0 {
            self.gate.add_permits(1);
        }
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

#[async_trait]
impl Storage for GatedStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        // The permit goes straight back, so one permit admits every reader.
        drop(self.gate.acquire().await);
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.inner.remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}
