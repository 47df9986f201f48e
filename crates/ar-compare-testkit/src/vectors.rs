//! Golden vectors for persisted payloads.
//!
//! Each vector is a raw stored value and the selection a store with the given
//! capacity must hold after hydrating from it. Together they pin down the
//! backward-compatibility contract: unreadable or wrongly-shaped values mean
//! "nothing saved", never an error.

use std::num::NonZeroUsize;

use serde::Serialize;

use ar_compare_core::{decode_state, ComparisonState};

/// A single golden vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,
    /// The stored value.
    pub raw: &'static str,
    /// Capacity of the hydrating store.
    pub max_items: usize,
    /// Selected ids after hydration, in position order.
    pub expected: &'static [&'static str],
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "single_saved_product",
            description: "One item, exactly as the store writes it",
            raw: r#"{"items":[{"productId":"saved-product","position":0}],"maxItems":4}"#,
            max_items: 4,
            expected: &["saved-product"],
        },
        GoldenVector {
            name: "full_selection",
            description: "Four items at capacity",
            raw: r#"{"items":[{"productId":"a","position":0},{"productId":"b","position":1},{"productId":"c","position":2},{"productId":"d","position":3}],"maxItems":4}"#,
            max_items: 4,
            expected: &["a", "b", "c", "d"],
        },
        GoldenVector {
            name: "empty_selection",
            description: "Saved after clearing",
            raw: r#"{"items":[],"maxItems":4}"#,
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "extra_fields",
            description: "Unknown fields are ignored",
            raw: r#"{"items":[{"productId":"a","position":0,"addedAt":1}],"maxItems":4,"version":2}"#,
            max_items: 4,
            expected: &["a"],
        },
        GoldenVector {
            name: "not_json",
            description: "Corrupted value",
            raw: "{items:[",
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "empty_string",
            description: "Empty value",
            raw: "",
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "json_null",
            description: "Valid JSON, wrong shape",
            raw: "null",
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "bare_array",
            description: "A list of ids, not a comparison document",
            raw: r#"["a","b"]"#,
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "missing_max_items",
            description: "Document without maxItems",
            raw: r#"{"items":[{"productId":"a","position":0}]}"#,
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "items_not_array",
            description: "items is an object",
            raw: r#"{"items":{"productId":"a"},"maxItems":4}"#,
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "negative_position",
            description: "Stored positions are never trusted",
            raw: r#"{"items":[{"productId":"a","position":-1}],"maxItems":4}"#,
            max_items: 4,
            expected: &["a"],
        },
        GoldenVector {
            name: "zero_max_items",
            description: "The configured capacity replaces the stored one",
            raw: r#"{"items":[{"productId":"a","position":0}],"maxItems":0}"#,
            max_items: 4,
            expected: &["a"],
        },
        GoldenVector {
            name: "float_max_items",
            description: "Any JSON number is a valid maxItems",
            raw: r#"{"items":[{"productId":"a","position":0.0}],"maxItems":4.0}"#,
            max_items: 4,
            expected: &["a"],
        },
        GoldenVector {
            name: "string_max_items",
            description: "maxItems must be a number",
            raw: r#"{"items":[{"productId":"a","position":0}],"maxItems":"4"}"#,
            max_items: 4,
            expected: &[],
        },
        GoldenVector {
            name: "duplicate_ids",
            description: "First occurrence wins",
            raw: r#"{"items":[{"productId":"a","position":0},{"productId":"b","position":1},{"productId":"a","position":2}],"maxItems":4}"#,
            max_items: 4,
            expected: &["a", "b"],
        },
        GoldenVector {
            name: "sparse_positions",
            description: "Positions are reassigned from list order",
            raw: r#"{"items":[{"productId":"a","position":3},{"productId":"b","position":7}],"maxItems":4}"#,
            max_items: 4,
            expected: &["a", "b"],
        },
        GoldenVector {
            name: "over_configured_capacity",
            description: "Saved by a store with a larger capacity",
            raw: r#"{"items":[{"productId":"a","position":0},{"productId":"b","position":1},{"productId":"c","position":2}],"maxItems":6}"#,
            max_items: 2,
            expected: &["a", "b"],
        },
    ]
}

/// The ids a store with `max_items` capacity holds after hydrating from `raw`.
pub fn hydrated_ids(raw: &str, max_items: NonZeroUsize) -> Vec<String> {
    match decode_state(raw) {
        Ok(persisted) => {
            let (state, _) = ComparisonState::restore(persisted, max_items);
            state.product_ids().map(|id| id.to_string()).collect()
        }
        Err(_) => Vec::new(),
    }
}

/// Verify a vector against the codec. Returns the mismatch, if any.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let capacity = NonZeroUsize::new(vector.max_items)
        .ok_or_else(|| format!("{}: max_items must be positive", vector.name))?;
    let actual = hydrated_ids(vector.raw, capacity);

    if actual != vector.expected {
        return Err(format!(
            "{}: expected {:?}, got {:?}",
            vector.name, vector.expected, actual
        ));
    }
    Ok(())
}

/// Export all vectors as pretty-printed JSON, for implementations that read
/// the same storage slot.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}

/// Verify all golden vectors.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        verify_vector(&vector)?;
    }
    Ok(())
}
