//! The comparison store: single source of truth for which products are being
//! compared.
//!
//! The store holds an immutable snapshot behind a lock. Every committed
//! mutation builds a new snapshot, swaps it in, queues a save with the
//! persistence worker, and publishes the change to observers. No-op
//! mutations do none of those things.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use ar_compare_core::{AddOutcome, ComparisonState, ProductId, RemoveOutcome, ToggleOutcome};
use ar_compare_store::Storage;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::ComparisonConfig;
use crate::error::{ComparisonError, Result};
use crate::observers::{Observers, SubscriptionId};
use crate::persistence::{PersistenceHandle, PersistenceWorker, WeakPersistenceHandle};

/// What a consumer renders from: the current selection and whether it already
/// reflects persisted storage.
#[derive(Debug, Clone)]
pub struct ComparisonView {
    pub comparison: Arc<ComparisonState>,
    pub is_hydrated: bool,
}

/// State shared between store handles and the persistence worker.
pub(crate) struct Shared {
    state: RwLock<Arc<ComparisonState>>,
    hydrated: watch::Sender<bool>,
    observers: Observers,
    capacity: NonZeroUsize,
}

impl Shared {
    fn new(capacity: NonZeroUsize, hydrated: bool) -> Self {
        let (hydrated, _) = watch::channel(hydrated);
        Self {
            state: RwLock::new(Arc::new(ComparisonState::with_capacity(capacity))),
            hydrated,
            observers: Observers::new(),
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub(crate) fn snapshot(&self) -> Arc<ComparisonState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn is_hydrated(&self) -> bool {
        *self.hydrated.borrow()
    }

    /// Snapshot and flag read under one lock, so a view never pairs the
    /// hydrated state with `is_hydrated == false`.
    fn view(&self) -> ComparisonView {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        ComparisonView {
            comparison: Arc::clone(&state),
            is_hydrated: self.is_hydrated(),
        }
    }

    fn publish(&self) {
        self.observers.publish(|| self.view());
    }

    /// The one `UNHYDRATED -> HYDRATED` transition.
    ///
    /// A restored state replaces whatever is in memory, including changes made
    /// since the store was mounted. `None` keeps the current state.
    pub(crate) fn finish_hydration(&self, restored: Option<ComparisonState>) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if self.is_hydrated() {
                return;
            }
            if let Some(restored) = restored {
                *state = Arc::new(restored);
            }
            self.hydrated.send_replace(true);
        }
        self.publish();
    }
}

/// Capacity-bounded, deduplicated, persisted comparison selection.
///
/// Cheap to clone; clones share one snapshot, one observer registry, and
/// one persistence worker. Create it with
/// [`ComparisonProvider::mount`](crate::ComparisonProvider::mount) or
/// [`ComparisonStore::open`].
#[derive(Clone)]
pub struct ComparisonStore {
    shared: Arc<Shared>,
    persistence: PersistenceHandle,
    config: Arc<ComparisonConfig>,
}

impl ComparisonStore {
    /// Create the store and start hydration from `storage`.
    ///
    /// Must be called from within a tokio runtime: the persistence worker is
    /// spawned onto the current one. Hydration runs on the worker's first
    /// poll, so the store is always `UNHYDRATED` and empty when this returns
    /// (unless hydration is disabled in `config`).
    pub fn open(storage: Arc<dyn Storage>, config: ComparisonConfig) -> Result<Self> {
        let capacity = config.validate()?;
        let runtime =
            Handle::try_current().map_err(|e| ComparisonError::NoRuntime(e.to_string()))?;

        let shared = Arc::new(Shared::new(capacity, !config.hydrate_on_mount));
        let persistence = PersistenceWorker::spawn(
            &runtime,
            storage,
            config.storage_key.clone(),
            Arc::clone(&shared),
            config.hydrate_on_mount,
        );

        tracing::debug!(
            key = %config.storage_key,
            max_items = capacity.get(),
            hydrate = config.hydrate_on_mount,
            "mounted comparison store"
        );

        Ok(Self {
            shared,
            persistence,
            config: Arc::new(config),
        })
    }

    /// The configuration the store was mounted with.
    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The current snapshot.
    ///
    /// Two calls return the same `Arc` until a mutation commits, so
    /// `Arc::ptr_eq` tells whether anything changed.
    pub fn snapshot(&self) -> Arc<ComparisonState> {
        self.shared.snapshot()
    }

    /// The current snapshot together with the hydration flag.
    pub fn view(&self) -> ComparisonView {
        self.shared.view()
    }

    /// Whether persisted state has been loaded (or hydration was disabled).
    pub fn is_hydrated(&self) -> bool {
        self.shared.is_hydrated()
    }

    pub fn max_items(&self) -> usize {
        self.shared.capacity.get()
    }

    /// Whether `product_id` is currently selected.
    pub fn is_in_comparison(&self, product_id: &str) -> bool {
        self.snapshot().contains(product_id)
    }

    /// Whether [`add_item`](Self::add_item) would currently add `product_id`.
    pub fn can_add(&self, product_id: &str) -> bool {
        self.snapshot().can_add(product_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `product_id` to the comparison.
    ///
    /// Already-selected ids and adds to a full comparison are silent no-ops.
    pub fn add_item(&self, product_id: impl Into<ProductId>) -> AddOutcome {
        let product_id = product_id.into();
        let outcome = self.commit(|state| {
            let outcome = state.add_item(product_id.clone());
            (outcome, outcome.is_added())
        });

        match outcome {
            AddOutcome::Added { position } => {
                tracing::debug!(%product_id, position, "added product to comparison");
            }
            AddOutcome::AlreadyPresent { .. } => {
                tracing::debug!(%product_id, "product already in comparison");
            }
            AddOutcome::AtCapacity => {
                tracing::debug!(%product_id, max_items = self.max_items(), "comparison is full");
            }
        }
        outcome
    }

    /// Remove `product_id`, moving later items up one position.
    pub fn remove_item(&self, product_id: &str) -> RemoveOutcome {
        let outcome = self.commit(|state| {
            let outcome = state.remove_item(product_id);
            (outcome, outcome.is_removed())
        });

        if let RemoveOutcome::Removed { position } = outcome {
            tracing::debug!(product_id, position, "removed product from comparison");
        }
        outcome
    }

    /// Remove `product_id` when selected, otherwise add it.
    pub fn toggle_item(&self, product_id: impl Into<ProductId>) -> ToggleOutcome {
        let product_id = product_id.into();
        let outcome = self.commit(|state| {
            let outcome = state.toggle_item(product_id.clone());
            (outcome, outcome.is_change())
        });

        tracing::debug!(%product_id, ?outcome, "toggled product in comparison");
        outcome
    }

    /// Remove every product. Capacity is unchanged.
    ///
    /// Always persists and notifies, even when the comparison was empty.
    pub fn clear_comparison(&self) {
        self.commit(|state| {
            state.clear();
            ((), true)
        });
        tracing::debug!("cleared comparison");
    }

    /// Apply `op` to a copy of the current state and, when it reports a
    /// change, publish the copy.
    fn commit<T>(&self, op: impl FnOnce(&mut ComparisonState) -> (T, bool)) -> T {
        let outcome = {
            let mut current = self
                .shared
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            let mut next = ComparisonState::clone(&current);
            let (outcome, changed) = op(&mut next);
            if !changed {
                return outcome;
            }

            *current = Arc::new(next);
            outcome
        };

        self.persistence.schedule_save();
        self.shared.publish();
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscription and lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Register `observer` to be called after committed changes and once when
    /// hydration completes.
    ///
    /// The observer usually runs on the task that made the change. When
    /// another thread is already delivering, that thread runs it instead, and
    /// changes made in quick succession may arrive as one view. The last view
    /// delivered is always the current snapshot.
    ///
    /// The registry owns `observer`. An observer that captures a
    /// `ComparisonStore` keeps the store, and its persistence worker, alive
    /// forever; capture a [`WeakComparisonStore`] from
    /// [`downgrade`](Self::downgrade) instead.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&ComparisonView) + Send + Sync + 'static,
    {
        self.shared.observers.subscribe(Arc::new(observer))
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakComparisonStore {
        WeakComparisonStore {
            shared: Arc::downgrade(&self.shared),
            persistence: self.persistence.downgrade(),
            config: Arc::downgrade(&self.config),
        }
    }

    /// Wait until the store is hydrated.
    pub async fn wait_hydrated(&self) {
        let mut hydrated = self.shared.hydrated.subscribe();
        // The sender lives in `Shared`, which `self` keeps alive.
        let _ = hydrated.wait_for(|hydrated| *hydrated).await;
    }

    /// Wait until every save queued before this call has been attempted.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }
}

impl fmt::Debug for ComparisonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonStore")
            .field("storage_key", &self.config.storage_key)
            .field("comparison", &self.snapshot())
            .field("is_hydrated", &self.is_hydrated())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Non-owning handle to a [`ComparisonStore`], for observers that need to
/// call back into the store.
#[derive(Clone)]
pub struct WeakComparisonStore {
    shared: Weak<Shared>,
    persistence: WeakPersistenceHandle,
    config: Weak<ComparisonConfig>,
}

impl WeakComparisonStore {
    /// The store, unless every `ComparisonStore` handle has been dropped.
    pub fn upgrade(&self) -> Option<ComparisonStore> {
        Some(ComparisonStore {
            persistence: self.persistence.upgrade()?,
            shared: self.shared.upgrade()?,
            config: self.config.upgrade()?,
        })
    }
}

impl fmt::Debug for WeakComparisonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComparisonStore").finish_non_exhaustive()
    }
}
