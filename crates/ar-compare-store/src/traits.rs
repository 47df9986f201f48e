//! Storage trait: the abstract interface for named-slot persistence.
//!
//! This trait lets the comparison store stay backend-agnostic. It models a
//! device-local key-value medium: string keys, string values, one slot per
//! key. Implementations include SQLite (on disk) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async interface for key-value persistence.
///
/// All methods are async so both blocking (SQLite) and non-blocking backends
/// fit. For SQLite, `spawn_blocking` is used internally.
///
/// # Design Notes
///
/// - **Whole-value writes**: `set_item` replaces the slot. There is no merge.
/// - **Last writer wins**: two handles on the same medium are not coordinated.
/// - **Absent is not an error**: `get_item` on an unknown key returns `None`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// List every stored key, sorted.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key.
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }
}
