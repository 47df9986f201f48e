//! # AR Compare Store
//!
//! Storage abstraction for AR Compare. Provides a trait-based interface
//! for named-slot persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The comparison store writes its whole state to one slot and reads it back
//! on startup. This crate hides where that slot lives behind the [`Storage`]
//! trait. The on-disk implementation is [`SqliteStorage`], with
//! [`MemoryStorage`] for testing.
//!
//! ## Key Types
//!
//! - [`Storage`] - The async trait for all storage operations
//! - [`SqliteStorage`] - SQLite-based persistent storage
//! - [`MemoryStorage`] - In-memory storage with an optional byte quota
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ar_compare_store::{SqliteStorage, Storage};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let storage = SqliteStorage::open("compare.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let storage = SqliteStorage::open_memory().unwrap();
//!
//!     storage.set_item("ar-compare-comparison", "{}").await.unwrap();
//!     let raw = storage.get_item("ar-compare-comparison").await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value slots**: every write replaces the value under its key
//! - **Absent keys**: reading an unknown key is `Ok(None)`, not an error
//! - **No coordination**: independent handles on one medium are last-writer-wins

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::Storage;
