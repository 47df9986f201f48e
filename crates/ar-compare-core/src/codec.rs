//! Persisted layout of the comparison state.
//!
//! The state is stored as one UTF-8 JSON document:
//!
//! ```text
//! {"items":[{"productId":"...","position":0},...],"maxItems":4}
//! ```
//!
//! Decoding checks shape only: an object with an `items` array of
//! `{productId: string, position: number}` and a `maxItems` number. Unknown
//! extra fields are ignored. The numbers are kept as found, so zero, negative
//! or fractional values still decode; the restored state never trusts them.
//! Semantic repairs such as dropping duplicates happen in
//! [`ComparisonState::restore`](crate::ComparisonState::restore), not here.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{CodecError, Result};
use crate::state::ComparisonState;
use crate::types::ProductId;

/// One item exactly as found in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedItem {
    pub product_id: ProductId,
    pub position: Number,
}

/// The stored document before it is checked against the store's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub items: Vec<PersistedItem>,
    pub max_items: Number,
}

/// Encode a state into its persisted JSON form.
pub fn encode_state(state: &ComparisonState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Decode persisted JSON.
///
/// Returns [`CodecError::Json`] for text that is not JSON and
/// [`CodecError::Shape`] for JSON that is not a comparison document.
pub fn decode_state(raw: &str) -> Result<PersistedState> {
    let value: Value = serde_json::from_str(raw)?;

    if !value.is_object() {
        return Err(CodecError::Shape("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| CodecError::Shape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    #[test]
    fn test_encode_layout() {
        let mut state = ComparisonState::default();
        state.add_item("product-1".into());
        state.add_item("product-2".into());

        let json = encode_state(&state).unwrap();
        assert_eq!(
            json,
            r#"{"items":[{"productId":"product-1","position":0},{"productId":"product-2","position":1}],"maxItems":4}"#
        );
    }

    #[test]
    fn test_encode_empty() {
        let state = ComparisonState::with_capacity(NonZeroUsize::new(2).unwrap());
        assert_eq!(encode_state(&state).unwrap(), r#"{"items":[],"maxItems":2}"#);
    }

    #[test]
    fn test_decode_valid_document() {
        let raw = r#"{"items":[{"productId":"saved-product","position":0}],"maxItems":4}"#;
        let persisted = decode_state(raw).unwrap();

        assert_eq!(persisted.max_items, Number::from(4));
        assert_eq!(persisted.items.len(), 1);
        assert_eq!(persisted.items[0].product_id, "saved-product");
        assert_eq!(persisted.items[0].position, Number::from(0));
    }

    #[test]
    fn test_decode_accepts_any_number() {
        for raw in [
            r#"{"items":[{"productId":"a","position":0}],"maxItems":0}"#,
            r#"{"items":[{"productId":"a","position":0}],"maxItems":-3}"#,
            r#"{"items":[{"productId":"a","position":0}],"maxItems":4.0}"#,
            r#"{"items":[{"productId":"a","position":-1}],"maxItems":4}"#,
            r#"{"items":[{"productId":"a","position":0.5}],"maxItems":4}"#,
        ] {
            let persisted = decode_state(raw).unwrap();
            assert_eq!(persisted.items.len(), 1, "{}", raw);
            assert_eq!(persisted.items[0].product_id, "a");
        }
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let raw = r#"{"items":[],"maxItems":4,"savedAt":1700000000}"#;
        assert!(decode_state(raw).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_state("not json"), Err(CodecError::Json(_))));
        assert!(matches!(decode_state(""), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        for raw in [
            "null",
            "[]",
            r#""a string""#,
            r#"{"maxItems":4}"#,
            r#"{"items":[]}"#,
            r#"{"items":{},"maxItems":4}"#,
            r#"{"items":[],"maxItems":"4"}"#,
            r#"{"items":[],"maxItems":null}"#,
            r#"{"items":[{"position":0}],"maxItems":4}"#,
            r#"{"items":[{"productId":"a","position":"0"}],"maxItems":4}"#,
            r#"{"items":[{"productId":7,"position":0}],"maxItems":4}"#,
        ] {
            assert!(
                matches!(decode_state(raw), Err(CodecError::Shape(_))),
                "expected shape error for {}",
                raw
            );
        }
    }
}
