//! Proptest generators for property-based testing.

use proptest::prelude::*;

use serde_json::Number;

use ar_compare_core::{PersistedItem, PersistedState, ProductId};

/// One operation a UI can perform on the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Add(ProductId),
    Remove(ProductId),
    Toggle(ProductId),
    Clear,
}

/// Generate a product id from a small pool, so sequences hit duplicates and
/// removals of selected ids often.
pub fn product_id() -> impl Strategy<Value = ProductId> {
    (0u8..8).prop_map(|n| ProductId::new(format!("product-{}", n)))
}

/// Generate a capacity.
pub fn capacity() -> impl Strategy<Value = usize> {
    1usize..=6
}

/// Generate a single operation, weighted towards adds.
pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => product_id().prop_map(Op::Add),
        2 => product_id().prop_map(Op::Remove),
        2 => product_id().prop_map(Op::Toggle),
        1 => Just(Op::Clear),
    ]
}

/// Generate a sequence of up to `max_len` operations.
pub fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..=max_len)
}

/// Generate a JSON number as found in a stored document: any small integer,
/// negative or zero included, or an integral float.
pub fn persisted_number() -> impl Strategy<Value = Number> {
    prop_oneof![
        (-2i64..10).prop_map(Number::from),
        (0u32..10).prop_filter_map("finite", |n| Number::from_f64(f64::from(n))),
    ]
}

/// Generate a persisted document that may break every invariant: duplicate
/// ids, wrong positions, more items than its own `maxItems`.
pub fn persisted_state() -> impl Strategy<Value = PersistedState> {
    (
        prop::collection::vec((product_id(), persisted_number()), 0..10),
        persisted_number(),
    )
        .prop_map(|(items, max_items)| PersistedState {
            items: items
                .into_iter()
                .map(|(product_id, position)| PersistedItem {
                    product_id,
                    position,
                })
                .collect(),
            max_items,
        })
}

/// Apply `op` to a reference model: the selected ids in order.
///
/// This is the simplest possible statement of the comparison rules; the real
/// store must always agree with it.
pub fn apply_model(model: &mut Vec<ProductId>, max_items: usize, op: &Op) {
    match op {
        Op::Add(id) => {
            if !model.contains(id) && model.len() < max_items {
                model.push(id.clone());
            }
        }
        Op::Remove(id) => model.retain(|selected| selected != id),
        Op::Toggle(id) => {
            if model.contains(id) {
                model.retain(|selected| selected != id);
            } else if model.len() < max_items {
                model.push(id.clone());
            }
        }
        Op::Clear => model.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    use ar_compare_core::ComparisonState;

    proptest! {
        #[test]
        fn model_never_exceeds_capacity(cap in capacity(), ops in op_sequence(48)) {
            let mut model = Vec::new();
            for op in &ops {
                apply_model(&mut model, cap, op);
                prop_assert!(model.len() <= cap);
            }
        }

        #[test]
        fn model_never_holds_duplicates(ops in op_sequence(48)) {
            let mut model = Vec::new();
            for op in &ops {
                apply_model(&mut model, 4, op);
                let mut sorted = model.clone();
                sorted.sort();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), model.len());
            }
        }

        #[test]
        fn restore_normalizes_any_document(
            cap in capacity(),
            persisted in persisted_state(),
        ) {
            let max_items = NonZeroUsize::new(cap).unwrap();

            // Reference: first occurrence of each id, in list order, up to capacity.
            let mut expected: Vec<ProductId> = Vec::new();
            for item in &persisted.items {
                if !expected.contains(&item.product_id) {
                    expected.push(item.product_id.clone());
                }
            }
            let distinct = expected.len();
            expected.truncate(cap);

            let total = persisted.items.len();
            let (state, report) = ComparisonState::restore(persisted, max_items);

            prop_assert!(state.is_consistent());
            prop_assert_eq!(state.max_items(), cap);
            let restored: Vec<ProductId> = state.product_ids().cloned().collect();
            prop_assert_eq!(&restored, &expected);
            prop_assert_eq!(report.duplicates_dropped + report.truncated, total - restored.len());
            // Repeats of an id lost to truncation count as truncated too.
            prop_assert!(report.truncated >= distinct - restored.len());
        }
    }
}
