#![forbid(unsafe_code)]

//! Single-writer dispatch store with change notification.
//!
//! # Design
//!
//! [`Store<S, A>`] holds state of type `S` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`) and mutates it only through
//! [`dispatch`](Store::dispatch): the reducer fixed at construction is the
//! sole writer. Every dispatched action is appended to an action log; when the
//! reduced state differs from the previous state (by `PartialEq`), the version
//! counter increments and all live subscribers are notified in registration
//! order.
//!
//! # Failure Modes
//!
//! - **Re-entrant dispatch**: Notification runs with all interior borrows
//!   released, so a subscriber may call `dispatch()` re-entrantly. The nested
//!   dispatch completes — including its own notification round — before
//!   control returns to the outer round, whose remaining subscribers still
//!   see the outer dispatch's state snapshot. Unbounded mutual triggering
//!   between subscribers recurses until the stack runs out; keep subscriber
//!   graphs acyclic.
//! - **Subscriber leak**: Dropping the [`Subscription`] guard unsubscribes;
//!   dead weak references are pruned lazily during notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, debug_span};

type CallbackRc<S> = Rc<dyn Fn(&S)>;
type CallbackWeak<S> = Weak<dyn Fn(&S)>;

struct StoreInner<S, A> {
    state: S,
    version: u64,
    /// Append-only record of every dispatched action, including no-ops.
    log: Vec<A>,
    /// Subscribers stored as weak references. Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<S>>,
}

/// A single-writer state store mutated only via action dispatch.
///
/// Cloning a `Store` creates a new handle to the **same** inner state — both
/// handles share the state, log, and subscribers.
///
/// # Invariants
///
/// 1. The reducer is the only code path that mutates `S`.
/// 2. `version` increments by exactly 1 per state-changing dispatch.
/// 3. A dispatch that leaves the state equal to its prior value is logged but
///    does not notify.
/// 4. Subscribers are notified in registration order.
pub struct Store<S, A> {
    inner: Rc<RefCell<StoreInner<S, A>>>,
    reducer: Rc<dyn Fn(&mut S, &A)>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            reducer: Rc::clone(&self.reducer),
        }
    }
}

impl<S: std::fmt::Debug, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("version", &inner.version)
            .field("log_len", &inner.log.len())
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<S: Clone + PartialEq + 'static, A> Store<S, A> {
    /// Create a store with the given initial state and reducer.
    ///
    /// The initial version is 0, the log is empty, and no subscribers are
    /// registered.
    #[must_use]
    pub fn new(initial: S, reducer: impl Fn(&mut S, &A) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: initial,
                version: 0,
                log: Vec::new(),
                subscribers: Vec::new(),
            })),
            reducer: Rc::new(reducer),
        }
    }

    /// Get a clone of the current state.
    #[must_use]
    pub fn state(&self) -> S {
        self.inner.borrow().state.clone()
    }

    /// Access the current state by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Dispatch an action: append it to the log, run the reducer, and notify
    /// subscribers if the state changed.
    pub fn dispatch(&self, action: A) {
        let _span = debug_span!(
            "store.dispatch",
            version = tracing::field::Empty,
            changed = tracing::field::Empty,
        )
        .entered();

        let changed = {
            let mut inner = self.inner.borrow_mut();
            let prior = inner.state.clone();
            (self.reducer)(&mut inner.state, &action);
            inner.log.push(action);
            if inner.state == prior {
                false
            } else {
                inner.version += 1;
                true
            }
        };

        let version = self.inner.borrow().version;
        tracing::Span::current().record("version", version);
        tracing::Span::current().record("changed", changed);

        if changed {
            self.notify();
        }
    }

    /// Subscribe to state changes. The callback receives a reference to the
    /// new state each time a dispatch changes it.
    ///
    /// Returns a [`Subscription`] guard; dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&S) + 'static) -> Subscription {
        let strong: CallbackRc<S> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version number. Increments by 1 per state-changing dispatch;
    /// useful for dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of actions dispatched so far (including no-ops).
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.inner.borrow().log.len()
    }

    /// Access the append-only action log by reference.
    pub fn with_log<R>(&self, f: impl FnOnce(&[A]) -> R) -> R {
        f(&self.inner.borrow().log)
    }

    /// Number of currently registered subscribers (including dead ones not
    /// yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Notify live subscribers and prune dead ones.
    fn notify(&self) {
        // Collect live callbacks first to avoid holding the borrow during calls.
        let callbacks: Vec<CallbackRc<S>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(|w| w.upgrade())
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        let state = self.inner.borrow().state.clone();
        debug!(subscribers = callbacks.len(), "store change notification");
        for cb in &callbacks {
            cb(&state);
        }
    }
}

/// RAII guard for a store subscriber.
///
/// Dropping the guard drops the strong reference to the callback, so the weak
/// reference in the store's subscriber list fails to upgrade on the next
/// notification cycle and is pruned.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone, Copy)]
    enum CounterAction {
        Add(i64),
        Reset,
    }

    fn counter_store() -> Store<i64, CounterAction> {
        Store::new(0i64, |state, action| match action {
            CounterAction::Add(n) => *state += n,
            CounterAction::Reset => *state = 0,
        })
    }

    #[test]
    fn dispatch_applies_reducer() {
        let store = counter_store();
        store.dispatch(CounterAction::Add(5));
        store.dispatch(CounterAction::Add(-2));
        assert_eq!(store.state(), 3);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn noop_dispatch_logs_but_does_not_bump_version() {
        let store = counter_store();
        store.dispatch(CounterAction::Add(0));
        store.dispatch(CounterAction::Reset);
        assert_eq!(store.version(), 0);
        assert_eq!(store.log_len(), 2);
    }

    #[test]
    fn log_is_append_only_and_complete() {
        let store = counter_store();
        store.dispatch(CounterAction::Add(1));
        store.dispatch(CounterAction::Reset);
        store.dispatch(CounterAction::Add(7));
        assert_eq!(store.log_len(), 3);
        let replayed = store.with_log(|log| {
            let mut s = 0i64;
            for action in log {
                match action {
                    CounterAction::Add(n) => s += n,
                    CounterAction::Reset => s = 0,
                }
            }
            s
        });
        assert_eq!(replayed, store.state());
    }

    #[test]
    fn subscribers_notified_on_change_only() {
        let store = counter_store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        store.dispatch(CounterAction::Add(1));
        assert_eq!(hits.get(), 1);
        store.dispatch(CounterAction::Add(0)); // No-op.
        assert_eq!(hits.get(), 1);
        store.dispatch(CounterAction::Add(2));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn subscriber_sees_new_state() {
        let store = counter_store();
        let last = Rc::new(Cell::new(0i64));
        let last_clone = Rc::clone(&last);
        let _sub = store.subscribe(move |s| last_clone.set(*s));

        store.dispatch(CounterAction::Add(42));
        assert_eq!(last.get(), 42);
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let store = counter_store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = store.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        store.dispatch(CounterAction::Add(1));
        assert_eq!(hits.get(), 1);

        drop(sub);
        store.dispatch(CounterAction::Add(1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let store = counter_store();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _s1 = store.subscribe(move |_| o1.borrow_mut().push('A'));
        let o2 = Rc::clone(&order);
        let _s2 = store.subscribe(move |_| o2.borrow_mut().push('B'));
        let o3 = Rc::clone(&order);
        let _s3 = store.subscribe(move |_| o3.borrow_mut().push('C'));

        store.dispatch(CounterAction::Add(1));
        assert_eq!(*order.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn clone_shares_state_and_subscribers() {
        let store1 = counter_store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = store1.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        let store2 = store1.clone();
        store2.dispatch(CounterAction::Add(9));
        assert_eq!(store1.state(), 9);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn reentrant_dispatch_from_subscriber_completes() {
        let store = counter_store();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = Rc::clone(&seen);
        let chained = store.clone();
        let _sub = store.subscribe(move |s| {
            seen_clone.borrow_mut().push(*s);
            // Follow-up dispatch from inside the notification, as a derived-
            // state subscriber would do. Guarded so it fires once.
            if *s == 1 {
                chained.dispatch(CounterAction::Add(10));
            }
        });

        store.dispatch(CounterAction::Add(1));
        // The nested dispatch ran to completion (state 11 observed) and both
        // rounds were logged.
        assert_eq!(*seen.borrow(), vec![1, 11]);
        assert_eq!(store.state(), 11);
        assert_eq!(store.log_len(), 2);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let store = counter_store();
        let _s1 = store.subscribe(|_| {});
        let s2 = store.subscribe(|_| {});
        assert_eq!(store.subscriber_count(), 2);

        drop(s2);
        assert_eq!(store.subscriber_count(), 2); // Not yet pruned.
        store.dispatch(CounterAction::Add(1));
        assert_eq!(store.subscriber_count(), 1);
    }
}
