//! Observer registry.
//!
//! Observers are plain callbacks invoked with the latest [`ComparisonView`]
//! after committed changes. Delivery is serialized: at most one thread runs
//! callbacks at a time, and it always reads the view fresh, so the last view
//! every observer receives is the current snapshot. A change committed while
//! another thread is delivering is handed to that thread, which may coalesce
//! several changes into one view.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::store::ComparisonView;

/// Handle returned by [`ComparisonStore::subscribe`](crate::ComparisonStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Observer = Arc<dyn Fn(&ComparisonView) + Send + Sync>;

#[derive(Default)]
struct Delivery {
    /// A thread is currently running callbacks.
    running: bool,
    /// A change was committed that no delivered view reflects yet.
    pending: bool,
}

pub(crate) struct Observers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Observer)>>,
    delivery: Mutex<Delivery>,
}

/// Releases the delivery slot if a callback panics.
struct DeliveryGuard<'a> {
    delivery: &'a Mutex<Delivery>,
    armed: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
            delivery.running = false;
        }
    }
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
            delivery: Mutex::new(Delivery::default()),
        }
    }

    pub(crate) fn subscribe(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Announce a committed change and deliver views until none is pending.
    ///
    /// `latest` is called after the pending flag is cleared, so a change
    /// committed after that point either is in the view or sets the flag
    /// again. Called from inside a callback, this only sets the flag; the
    /// outer delivery picks the change up when the current round finishes.
    pub(crate) fn publish(&self, latest: impl Fn() -> ComparisonView) {
        {
            let mut delivery = self.lock_delivery();
            delivery.pending = true;
            if delivery.running {
                return;
            }
            delivery.running = true;
        }

        let mut guard = DeliveryGuard {
            delivery: &self.delivery,
            armed: true,
        };
        loop {
            {
                let mut delivery = self.lock_delivery();
                if !delivery.pending {
                    delivery.running = false;
                    guard.armed = false;
                    return;
                }
                delivery.pending = false;
            }
            self.notify(&latest());
        }
    }

    /// Call every observer in subscription order.
    ///
    /// The list is copied first, so observers may subscribe or unsubscribe
    /// from inside the callback. Such changes apply from the next notification.
    fn notify(&self, view: &ComparisonView) {
        let observers: Vec<Observer> = self
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(view);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_delivery(&self) -> MutexGuard<'_, Delivery> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_compare_core::ComparisonState;
    use std::sync::atomic::AtomicUsize;

    fn view() -> ComparisonView {
        ComparisonView {
            comparison: Arc::new(ComparisonState::default()),
            is_hydrated: true,
        }
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let observers = Observers::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            observers.subscribe(Arc::new(move |_: &ComparisonView| {
                log.lock().unwrap().push(name)
            }));
        }

        observers.publish(view);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let observers = Observers::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = observers.subscribe(Arc::new(move |_: &ComparisonView| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        observers.publish(view);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.publish(view);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let observers = Observers::new();
        let a = observers.subscribe(Arc::new(|_: &ComparisonView| {}));
        let b = observers.subscribe(Arc::new(|_: &ComparisonView| {}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_publish_from_callback_is_delivered_after_round() {
        let observers = Arc::new(Observers::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let republished = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&observers);
        let sink = Arc::clone(&log);
        let once = Arc::clone(&republished);
        observers.subscribe(Arc::new(move |_: &ComparisonView| {
            sink.lock().unwrap().push("first");
            if once.fetch_add(1, Ordering::SeqCst) == 0 {
                inner.publish(view);
            }
        }));
        let sink = Arc::clone(&log);
        observers.subscribe(Arc::new(move |_: &ComparisonView| {
            sink.lock().unwrap().push("second");
        }));

        observers.publish(view);

        // The nested publish waits for the round in progress instead of running inside it.
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn test_panicking_observer_releases_delivery() {
        let observers = Observers::new();
        let id = observers.subscribe(Arc::new(|_: &ComparisonView| panic!("observer failed")));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            observers.publish(view);
        }));
        assert!(result.is_err());

        observers.unsubscribe(id);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        observers.subscribe(Arc::new(move |_: &ComparisonView| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        observers.publish(view);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
