//! Provider and context: how UI code reaches the one store of a session.
//!
//! There is no global store. The application mounts a [`ComparisonProvider`]
//! at startup and hands its [`ComparisonContext`] down to whatever builds the
//! UI. Code that needs the store calls [`ComparisonContext::use_comparison`],
//! which fails loudly when nothing was provided: that is a wiring bug, not a
//! runtime data problem.

use std::sync::Arc;

use ar_compare_store::Storage;

use crate::config::ComparisonConfig;
use crate::error::{ComparisonError, Result};
use crate::store::ComparisonStore;

/// Owns the session's comparison store.
#[derive(Debug, Clone)]
pub struct ComparisonProvider {
    store: ComparisonStore,
}

impl ComparisonProvider {
    /// Open the store on `storage` and start hydration.
    ///
    /// See [`ComparisonStore::open`] for the runtime requirement.
    pub fn mount(storage: Arc<dyn Storage>, config: ComparisonConfig) -> Result<Self> {
        Ok(Self {
            store: ComparisonStore::open(storage, config)?,
        })
    }

    /// Wrap an already opened store.
    pub fn from_store(store: ComparisonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ComparisonStore {
        &self.store
    }

    /// A context for descendants of this provider.
    pub fn context(&self) -> ComparisonContext {
        ComparisonContext::with_store(self.store.clone())
    }
}

/// Explicitly threaded handle to the session's store, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct ComparisonContext {
    store: Option<ComparisonStore>,
}

impl ComparisonContext {
    /// A context with no provider above it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: ComparisonStore) -> Self {
        Self { store: Some(store) }
    }

    /// Install `store`, returning the one it replaces.
    pub fn provide(&mut self, store: ComparisonStore) -> Option<ComparisonStore> {
        self.store.replace(store)
    }

    /// Remove the store from this context.
    pub fn take(&mut self) -> Option<ComparisonStore> {
        self.store.take()
    }

    pub fn is_provided(&self) -> bool {
        self.store.is_some()
    }

    /// The provided store.
    ///
    /// # Errors
    ///
    /// [`ComparisonError::MissingProvider`] when no store was provided. Callers
    /// should propagate it rather than fall back to an empty comparison.
    pub fn use_comparison(&self) -> Result<&ComparisonStore> {
        self.store.as_ref().ok_or(ComparisonError::MissingProvider)
    }
}

impl From<&ComparisonProvider> for ComparisonContext {
    fn from(provider: &ComparisonProvider) -> Self {
        provider.context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_compare_store::MemoryStorage;

    #[test]
    fn test_use_comparison_without_provider_fails() {
        let context = ComparisonContext::new();
        let err = context.use_comparison().unwrap_err();

        assert!(matches!(err, ComparisonError::MissingProvider));
        assert!(err.to_string().contains("ComparisonProvider"));
    }

    #[tokio::test]
    async fn test_context_reaches_provider_store() {
        let provider =
            ComparisonProvider::mount(Arc::new(MemoryStorage::new()), ComparisonConfig::default())
                .unwrap();
        let context = provider.context();

        context.use_comparison().unwrap().add_item("product-1");

        // Every context derived from the provider shares the one store.
        assert!(provider.store().is_in_comparison("product-1"));
        assert!(ComparisonContext::from(&provider)
            .use_comparison()
            .unwrap()
            .is_in_comparison("product-1"));
    }

    #[tokio::test]
    async fn test_provide_and_take() {
        let provider =
            ComparisonProvider::mount(Arc::new(MemoryStorage::new()), ComparisonConfig::default())
                .unwrap();

        let mut context = ComparisonContext::new();
        assert!(!context.is_provided());
        assert!(context.provide(provider.store().clone()).is_none());
        assert!(context.use_comparison().is_ok());

        assert!(context.take().is_some());
        assert!(matches!(
            context.use_comparison(),
            Err(ComparisonError::MissingProvider)
        ));
    }
}
