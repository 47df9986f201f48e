//! Configuration for the comparison store.

use std::num::NonZeroUsize;

use ar_compare_core::DEFAULT_MAX_ITEMS;

use crate::error::{ComparisonError, Result};

/// Storage slot the comparison is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "ar-compare-comparison";

/// Configuration for a [`ComparisonStore`](crate::ComparisonStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonConfig {
    /// Key of the storage slot holding the persisted comparison.
    pub storage_key: String,
    /// Capacity ceiling. Fixed for the lifetime of the store.
    pub max_items: usize,
    /// Whether to read the persisted comparison when the store is mounted.
    ///
    /// When false the store starts hydrated and empty, but still persists
    /// every mutation.
    pub hydrate_on_mount: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            max_items: DEFAULT_MAX_ITEMS,
            hydrate_on_mount: true,
        }
    }
}

impl ComparisonConfig {
    /// Use a different storage slot.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different capacity.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Start hydrated and empty instead of reading storage.
    pub fn without_hydration(mut self) -> Self {
        self.hydrate_on_mount = false;
        self
    }

    /// Check the configuration and return the capacity.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        if self.storage_key.is_empty() {
            return Err(ComparisonError::InvalidConfig(
                "storage_key must not be empty".into(),
            ));
        }
        NonZeroUsize::new(self.max_items).ok_or_else(|| {
            ComparisonError::InvalidConfig("max_items must be at least 1".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComparisonConfig::default();
        assert_eq!(config.storage_key, "ar-compare-comparison");
        assert_eq!(config.max_items, 4);
        assert!(config.hydrate_on_mount);
        assert_eq!(config.validate().unwrap().get(), 4);
    }

    #[test]
    fn test_builder() {
        let config = ComparisonConfig::default()
            .with_storage_key("preview-comparison")
            .with_max_items(2)
            .without_hydration();

        assert_eq!(config.storage_key, "preview-comparison");
        assert_eq!(config.max_items, 2);
        assert!(!config.hydrate_on_mount);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = ComparisonConfig::default()
            .with_max_items(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let err = ComparisonConfig::default()
            .with_storage_key("")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidConfig(_)));
    }
}
