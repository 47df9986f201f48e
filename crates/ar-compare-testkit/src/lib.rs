//! # AR Compare Testkit
//!
//! Testing utilities for AR Compare.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Storages that record writes, fail every call, or hold reads back
//! - **Generators**: Proptest strategies for operation sequences and persisted documents
//! - **Golden vectors**: Stored values with the selection they must hydrate to
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ar_compare_testkit::vectors::{all_vectors, verify_vector};
//!
//! for vector in all_vectors() {
//!     verify_vector(&vector).unwrap();
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ar_compare_testkit::generators::{apply_model, op_sequence};
//!
//! proptest! {
//!     #[test]
//!     fn store_agrees_with_model(ops in op_sequence(32)) {
//!         let mut model = Vec::new();
//!         for op in &ops {
//!             apply_model(&mut model, 4, op);
//!         }
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    FailingStorage, GatedStorage, RecordingStorage, SAVED_PRODUCT_PAYLOAD, STORAGE_KEY,
};
pub use generators::{apply_model, op, op_sequence, persisted_state, Op};
pub use vectors::{
    all_vectors, hydrated_ids, vectors_json, verify_all_vectors, verify_vector, GoldenVector,
};
