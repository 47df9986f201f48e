//! # AR Compare
//!
//! The comparison store of the AR Compare site: which products the user has
//! picked for side-by-side comparison.
//!
//! ## Overview
//!
//! - **Bounded**: at most `max_items` products (4 by default)
//! - **Unique**: a product is selected at most once
//! - **Dense**: every item's position equals its index
//! - **Persisted**: every change is written, best-effort, to one storage slot
//! - **Hydrated**: the saved selection is loaded once, just after mounting
//! - **Observable**: observers run after every committed change
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ar_compare::{ComparisonConfig, ComparisonProvider};
//! use ar_compare::storage::SqliteStorage;
//!
//! async fn example() {
//!     // Open device storage
//!     let storage = SqliteStorage::open("compare.db").unwrap();
//!
//!     // Mount the provider once per session
//!     let provider =
//!         ComparisonProvider::mount(Arc::new(storage), ComparisonConfig::default()).unwrap();
//!
//!     // Hand the context to the UI
//!     let context = provider.context();
//!     let store = context.use_comparison().unwrap();
//!
//!     store.wait_hydrated().await;
//!     store.add_item("xreal-air-2");
//!     assert!(store.is_in_comparison("xreal-air-2"));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ar_compare::core` - Data model and codec
//! - `ar_compare::storage` - Storage abstraction, SQLite and in-memory backends

pub mod catalog;
pub mod config;
pub mod error;
pub mod observers;
mod persistence;
pub mod provider;
pub mod store;

// Re-export component crates
pub use ar_compare_core as core;
pub use ar_compare_store as storage;

// Re-export main types for convenience
pub use catalog::{resolve_selection, ProductCatalog, ResolvedItem};
pub use config::{ComparisonConfig, DEFAULT_STORAGE_KEY};
pub use error::{ComparisonError, Result};
pub use observers::SubscriptionId;
pub use provider::{ComparisonContext, ComparisonProvider};
pub use store::{ComparisonStore, ComparisonView, WeakComparisonStore};

// Re-export commonly used core types
pub use ar_compare_core::{
    AddOutcome, ComparisonItem, ComparisonState, ProductId, RemoveOutcome, ToggleOutcome,
    DEFAULT_MAX_ITEMS,
};
