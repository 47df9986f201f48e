//! # AR Compare Core
//!
//! Pure data model for the product comparison selection.
//!
//! This crate contains no I/O and no async code. It defines what a valid
//! comparison looks like and how it is written to and read from storage.
//!
//! ## Key Types
//!
//! - [`ProductId`] - Opaque reference into the external product catalog
//! - [`ComparisonItem`] - A selected product and its position
//! - [`ComparisonState`] - The ordered, unique, capacity-bounded selection
//! - [`PersistedState`] - The stored document before invariant checks
//!
//! ## Persisted Layout
//!
//! See the [`codec`] module.

pub mod codec;
pub mod error;
pub mod state;
pub mod types;

pub use codec::{decode_state, encode_state, PersistedItem, PersistedState};
pub use error::{CodecError, Result};
pub use state::{
    AddOutcome, ComparisonItem, ComparisonState, RemoveOutcome, RestoreReport, ToggleOutcome,
    DEFAULT_MAX_ITEMS,
};
pub use types::ProductId;
