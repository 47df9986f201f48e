//! Persistence worker: hydration and best-effort saves.
//!
//! One worker task per store owns the storage handle. It hydrates first, then
//! processes commands in order, so storage access is strictly sequential and
//! the hydration read sees storage as it was when the store was mounted.
//! A save writes the *latest* snapshot, not the one current when the save was
//! queued, so after the queue drains storage holds exactly what is in memory.

use std::sync::Arc;

use ar_compare_core::{decode_state, encode_state, ComparisonState};
use ar_compare_store::Storage;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::store::Shared;

enum Command {
    Save,
    Flush(oneshot::Sender<()>),
}

/// Sending side held by every store handle.
#[derive(Clone)]
pub(crate) struct PersistenceHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl PersistenceHandle {
    /// Queue a save. Never blocks and never fails the caller.
    pub(crate) fn schedule_save(&self) {
        if self.tx.send(Command::Save).is_err() {
            tracing::warn!("persistence worker stopped; comparison change not saved");
        }
    }

    pub(crate) fn downgrade(&self) -> WeakPersistenceHandle {
        WeakPersistenceHandle {
            tx: self.tx.downgrade(),
        }
    }

    /// Wait for every previously queued command to be processed.
    pub(crate) async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

/// Does not keep the worker running.
#[derive(Clone)]
pub(crate) struct WeakPersistenceHandle {
    tx: mpsc::WeakUnboundedSender<Command>,
}

impl WeakPersistenceHandle {
    pub(crate) fn upgrade(&self) -> Option<PersistenceHandle> {
        self.tx.upgrade().map(|tx| PersistenceHandle { tx })
    }
}

pub(crate) struct PersistenceWorker {
    storage: Arc<dyn Storage>,
    key: String,
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl PersistenceWorker {
    /// Start the worker on `runtime`.
    ///
    /// The worker stops once every [`PersistenceHandle`] is dropped and the
    /// remaining commands are processed.
    pub(crate) fn spawn(
        runtime: &Handle,
        storage: Arc<dyn Storage>,
        key: String,
        shared: Arc<Shared>,
        hydrate: bool,
    ) -> PersistenceHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self {
            storage,
            key,
            shared,
            rx,
        };
        runtime.spawn(worker.run(hydrate));
        PersistenceHandle { tx }
    }

    async fn run(mut self, hydrate: bool) {
        if hydrate {
            let restored = self.load().await;
            self.shared.finish_hydration(restored);
        }

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Save => self.save().await,
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        tracing::debug!(key = %self.key, "persistence worker stopped");
    }

    /// Read and restore the persisted comparison. Every failure means
    /// "nothing saved".
    async fn load(&self) -> Option<ComparisonState> {
        let raw = match self.storage.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved comparison");
                return None;
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to read saved comparison");
                return None;
            }
        };

        let persisted = match decode_state(&raw) {
            Ok(persisted) => persisted,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "discarding unreadable saved comparison");
                return None;
            }
        };

        let (state, report) = ComparisonState::restore(persisted, self.shared.capacity());
        if !report.is_clean() {
            tracing::warn!(
                key = %self.key,
                duplicates_dropped = report.duplicates_dropped,
                truncated = report.truncated,
                positions_rewritten = report.positions_rewritten,
                persisted_max_items = ?report.capacity_mismatch,
                "normalized saved comparison"
            );
        }
        tracing::debug!(key = %self.key, items = state.len(), "hydrated comparison");
        Some(state)
    }

    async fn save(&self) {
        let snapshot = self.shared.snapshot();

        let payload = match encode_state(&snapshot) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to encode comparison");
                return;
            }
        };

        if let Err(error) = self.storage.set_item(&self.key, &payload).await {
            tracing::warn!(key = %self.key, %error, "failed to persist comparison");
        }
    }
}
