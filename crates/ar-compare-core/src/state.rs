//! Comparison state: the ordered, deduplicated, capacity-bounded selection.
//!
//! Every mutation keeps three invariants:
//!
//! 1. `items.len() <= max_items`
//! 2. no two items share a product id
//! 3. `items[i].position == i`
//!
//! `max_items` is fixed when the state is created and no operation changes it.

use std::num::NonZeroUsize;

use serde::Serialize;
use serde_json::Number;

use crate::codec::PersistedState;
use crate::types::ProductId;

/// Capacity used when nothing else is configured.
pub const DEFAULT_MAX_ITEMS: usize = 4;

/// One selected product and its rank in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonItem {
    /// The catalog entry this item refers to.
    pub product_id: ProductId,
    /// Zero-based rank, always equal to the item's index.
    pub position: usize,
}

impl ComparisonItem {
    fn new(product_id: ProductId, position: usize) -> Self {
        Self {
            product_id,
            position,
        }
    }
}

/// Result of adding a product.
///
/// None of these are errors. Duplicate and over-capacity adds are defined
/// no-ops; the variant only tells the caller which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was appended at `position`.
    Added { position: usize },
    /// The product was already selected at `position`.
    AlreadyPresent { position: usize },
    /// The selection is full.
    AtCapacity,
}

impl AddOutcome {
    /// Whether the state changed.
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Result of removing a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The product was removed from `position`; later items moved up by one.
    Removed { position: usize },
    /// The product was not selected.
    NotPresent,
}

impl RemoveOutcome {
    /// Whether the state changed.
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed { .. })
    }
}

/// Result of toggling a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added { position: usize },
    Removed { position: usize },
    AtCapacity,
}

impl ToggleOutcome {
    /// Whether the state changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, ToggleOutcome::AtCapacity)
    }
}

/// What [`ComparisonState::restore`] had to discard to rebuild a valid state
/// from persisted data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Items dropped because their product id appeared earlier in the list.
    pub duplicates_dropped: usize,
    /// Items dropped because the list exceeded the configured capacity.
    pub truncated: usize,
    /// Positions that did not match their index and were rewritten.
    pub positions_rewritten: usize,
    /// The persisted `maxItems`, when it differs from the configured one.
    pub capacity_mismatch: Option<Number>,
}

impl RestoreReport {
    /// True when the persisted data was already a valid state.
    pub fn is_clean(&self) -> bool {
        self.duplicates_dropped == 0
            && self.truncated == 0
            && self.positions_rewritten == 0
            && self.capacity_mismatch.is_none()
    }
}

/// The comparison selection.
///
/// Fields are private so the invariants can only be changed through the
/// methods below. Serializes to the persisted layout
/// `{"items":[{"productId":..,"position":..}],"maxItems":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonState {
    items: Vec<ComparisonItem>,
    max_items: usize,
}

impl ComparisonState {
    /// Create an empty state with the given capacity.
    pub fn with_capacity(max_items: NonZeroUsize) -> Self {
        Self {
            items: Vec::with_capacity(max_items.get()),
            max_items: max_items.get(),
        }
    }

    /// Rebuild a state from persisted data under the configured capacity.
    ///
    /// The configured capacity always wins over the persisted `maxItems`.
    /// Duplicates keep their first occurrence, the list is truncated to
    /// capacity and positions are reassigned from the list order.
    pub fn restore(persisted: PersistedState, max_items: NonZeroUsize) -> (Self, RestoreReport) {
        let mut state = Self::with_capacity(max_items);
        let mut report = RestoreReport::default();

        if !number_is(&persisted.max_items, state.max_items) {
            report.capacity_mismatch = Some(persisted.max_items);
        }

        for item in persisted.items {
            if state.contains(item.product_id.as_str()) {
                report.duplicates_dropped += 1;
                continue;
            }
            if state.is_full() {
                report.truncated += 1;
                continue;
            }
            let position = state.items.len();
            if !number_is(&item.position, position) {
                report.positions_rewritten += 1;
            }
            state.items.push(ComparisonItem::new(item.product_id, position));
        }

        (state, report)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The selected items in position order.
    pub fn items(&self) -> &[ComparisonItem] {
        &self.items
    }

    /// The capacity ceiling.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another distinct product can no longer be added.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    pub fn remaining_capacity(&self) -> usize {
        self.max_items.saturating_sub(self.items.len())
    }

    /// Whether `product_id` is selected.
    pub fn contains(&self, product_id: &str) -> bool {
        self.position_of(product_id).is_some()
    }

    /// The position of `product_id`, if selected.
    pub fn position_of(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id.as_str() == product_id)
    }

    /// Whether [`add_item`](Self::add_item) would change the state.
    pub fn can_add(&self, product_id: &str) -> bool {
        !self.is_full() && !self.contains(product_id)
    }

    /// The selected product ids in position order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> + '_ {
        self.items.iter().map(|item| &item.product_id)
    }

    /// Check all three invariants.
    pub fn is_consistent(&self) -> bool {
        if self.items.len() > self.max_items {
            return false;
        }
        self.items.iter().enumerate().all(|(i, item)| {
            item.position == i
                && !self.items[..i]
                    .iter()
                    .any(|earlier| earlier.product_id == item.product_id)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `product_id` unless it is already selected or the state is full.
    pub fn add_item(&mut self, product_id: ProductId) -> AddOutcome {
        if let Some(position) = self.position_of(product_id.as_str()) {
            return AddOutcome::AlreadyPresent { position };
        }
        if self.is_full() {
            return AddOutcome::AtCapacity;
        }

        let position = self.items.len();
        self.items.push(ComparisonItem::new(product_id, position));
        AddOutcome::Added { position }
    }

    /// Remove `product_id` and close the gap it leaves.
    pub fn remove_item(&mut self, product_id: &str) -> RemoveOutcome {
        let Some(position) = self.position_of(product_id) else {
            return RemoveOutcome::NotPresent;
        };

        self.items.remove(position);
        self.reindex_from(position);
        RemoveOutcome::Removed { position }
    }

    /// Remove `product_id` when selected, add it otherwise.
    pub fn toggle_item(&mut self, product_id: ProductId) -> ToggleOutcome {
        if let RemoveOutcome::Removed { position } = self.remove_item(product_id.as_str()) {
            return ToggleOutcome::Removed { position };
        }
        if self.is_full() {
            return ToggleOutcome::AtCapacity;
        }

        let position = self.items.len();
        self.items.push(ComparisonItem::new(product_id, position));
        ToggleOutcome::Added { position }
    }

    /// Drop every item. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn reindex_from(&mut self, start: usize) {
        for (index, item) in self.items.iter_mut().enumerate().skip(start) {
            item.position = index;
        }
    }
}

/// Whether a persisted JSON number has the integral value `expected`.
/// `4` and `4.0` both match 4.
fn number_is(number: &Number, expected: usize) -> bool {
    match number.as_u64() {
        Some(value) => value == expected as u64,
        None => number.as_f64() == Some(expected as f64),
    }
}

impl Default for ComparisonState {
    fn default() -> Self {
        Self {
            items: Vec::with_capacity(DEFAULT_MAX_ITEMS),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}
