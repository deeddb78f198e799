use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::error::{DispatchResult, StoreError};
use crate::reducer::Reducer;

/// Callback notified with the new state after every successful dispatch
///
/// Identity is the `Arc` allocation: subscribing the same `Arc` twice yields a
/// single registration.
pub type Subscriber<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Store - holds application state and manages the Redux loop
///
/// The Store follows the Redux pattern:
/// - Centralized state management
/// - Actions are dispatched to modify state
/// - Pure reducers handle state transitions
/// - State is immutable (replaced on each action, never mutated in place)
///
/// `Store` is a handle: cloning it yields another handle onto the same state,
/// reducer and subscribers. Separately created stores share nothing.
///
/// # Dispatch ordering
///
/// Dispatches are serialized. The set of subscribers to notify is fixed when
/// a dispatch starts. The dispatch then runs the reducer, commits the new
/// state and notifies those subscribers in registration order. Calling `dispatch` again on the same
/// thread while that is in progress fails with
/// [`StoreError::ReentrantDispatch`]; calls from other threads wait.
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

struct Inner<S, A> {
    /// Held for the whole dispatch; the flag marks "dispatching" so a
    /// same-thread re-lock can be told apart from a fresh call
    dispatch_lock: ReentrantMutex<Cell<bool>>,
    state: RwLock<Arc<S>>,
    reducer: RwLock<Arc<dyn Reducer<S, A>>>,
    subscribers: Mutex<Subscribers<S>>,
}

struct Subscribers<S> {
    next_id: u64,
    entries: Vec<(u64, Subscriber<S>)>,
}

impl<S> Subscribers<S> {
    fn position_of(&self, subscriber: &Subscriber<S>) -> Option<usize> {
        self.entries
            .iter()
            .position(|(_, existing)| same_subscriber(existing, subscriber))
    }

    fn snapshot(&self) -> Vec<Subscriber<S>> {
        self.entries.iter().map(|(_, s)| Arc::clone(s)).collect()
    }
}

fn same_subscriber<S>(a: &Subscriber<S>, b: &Subscriber<S>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Resets the dispatching flag when a dispatch ends, including by unwinding
struct DispatchingFlag<'a>(&'a Cell<bool>);

impl Drop for DispatchingFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Construct a store with an explicit initial state
///
/// `initial_state` may be a plain `S` or an `Arc<S>`; in the latter case
/// [`Store::get_state`] returns that very `Arc` until the first dispatch.
pub fn create_store<S, A, R>(reducer: R, initial_state: impl Into<Arc<S>>) -> Store<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
    R: Reducer<S, A> + 'static,
{
    Store::with_state(reducer, initial_state)
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    /// Create a store whose initial state is `S::default()`
    pub fn new<R>(reducer: R) -> Self
    where
        S: Default,
        R: Reducer<S, A> + 'static,
    {
        Self::with_state(reducer, S::default())
    }

    /// Create a store with an explicit initial state
    pub fn with_state<R>(reducer: R, initial_state: impl Into<Arc<S>>) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                dispatch_lock: ReentrantMutex::new(Cell::new(false)),
                state: RwLock::new(initial_state.into()),
                reducer: RwLock::new(Arc::new(reducer)),
                subscribers: Mutex::new(Subscribers {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Run `action` through the reducer, commit the result and notify subscribers
    ///
    /// Returns the action that was dispatched. If the reducer panics, the
    /// panic propagates, the state is left as it was and nobody is notified.
    /// If a subscriber panics, the new state stays committed and the
    /// remaining subscribers are skipped for this round.
    pub fn dispatch(&self, action: A) -> DispatchResult<A> {
        let dispatching = self.inner.dispatch_lock.lock();
        if dispatching.get() {
            log::warn!("Store: rejected re-entrant dispatch");
            return Err(StoreError::ReentrantDispatch);
        }
        dispatching.set(true);
        let _reset = DispatchingFlag(&dispatching);

        // fixed for this round; later (un)subscribes apply to the next dispatch
        let subscribers = self.inner.subscribers.lock().snapshot();
        let reducer = Arc::clone(&*self.inner.reducer.read());
        let current = self.get_state();

        let next = Arc::new(reducer.reduce(&current, &action));
        *self.inner.state.write() = Arc::clone(&next);

        log::trace!("Store: state replaced, notifying {} subscriber(s)", subscribers.len());
        for subscriber in subscribers {
            subscriber(next.as_ref());
        }

        Ok(action)
    }

    /// Get the current state
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&*self.inner.state.read())
    }

    /// Register a subscriber
    ///
    /// Registering an `Arc` that is already subscribed does not add a second
    /// registration; the returned handle refers to the existing one.
    pub fn subscribe(&self, subscriber: Subscriber<S>) -> Unsubscribe {
        let mut subscribers = self.inner.subscribers.lock();
        let id = match subscribers.position_of(&subscriber) {
            Some(index) => subscribers.entries[index].0,
            None => {
                let id = subscribers.next_id;
                subscribers.next_id += 1;
                subscribers.entries.push((id, subscriber));
                log::debug!("Store: subscriber {} registered", id);
                id
            }
        };

        let inner: Arc<dyn Unregister> = self.inner.clone();
        Unsubscribe {
            store: Arc::downgrade(&inner),
            id,
        }
    }

    /// Register a closure as a fresh subscriber
    pub fn subscribe_fn<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(subscriber))
    }

    /// Swap the reducer used by subsequent dispatches
    ///
    /// The current state is kept and no subscriber is notified.
    pub fn replace_reducer<R>(&self, reducer: R)
    where
        R: Reducer<S, A> + 'static,
    {
        *self.inner.reducer.write() = Arc::new(reducer);
        log::debug!("Store: reducer replaced");
    }

    /// Number of active subscriber registrations
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().entries.len()
    }

    /// True while a dispatch is in progress on any thread
    pub fn is_dispatching(&self) -> bool {
        match self.inner.dispatch_lock.try_lock() {
            Some(dispatching) => dispatching.get(),
            None => true,
        }
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.read())
            .field("subscribers", &self.inner.subscribers.lock().entries.len())
            .finish()
    }
}

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64);
}

impl<S, A> Unregister for Inner<S, A>
where
    S: Send + Sync,
{
    fn unregister(&self, id: u64) {
        let mut subscribers = self.subscribers.lock();
        if let Some(index) = subscribers.entries.iter().position(|(existing, _)| *existing == id) {
            subscribers.entries.remove(index);
            log::debug!("Store: subscriber {} removed", id);
        }
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// Removes exactly the registration it was created for. Calling
/// [`Unsubscribe::unsubscribe`] more than once, or after the store was
/// dropped, does nothing. Dropping the handle does not unsubscribe.
#[derive(Clone)]
pub struct Unsubscribe {
    store: Weak<dyn Unregister>,
    id: u64,
}

impl Unsubscribe {
    pub fn unsubscribe(&self) {
        if let Some(store) = self.store.upgrade() {
            store.unregister(self.id);
        }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use pretty_assertions::assert_eq;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        counter: i64,
    }

    fn counter_reducer(state: &Counter, action: &Action) -> Counter {
        match action.kind.as_str() {
            "inc" => Counter {
                counter: state.counter + 1,
            },
            "dec" => Counter {
                counter: state.counter - 1,
            },
            _ => state.clone(),
        }
    }

    fn recorder<S: Clone + Send + Sync + 'static>() -> (Arc<Mutex<Vec<S>>>, Subscriber<S>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscriber: Subscriber<S> = Arc::new(move |state: &S| sink.lock().push(state.clone()));
        (seen, subscriber)
    }

    #[test]
    fn test_initial_state_is_identical() {
        let initial = Arc::new(Counter { counter: 7 });
        let store = create_store(counter_reducer, Arc::clone(&initial));
        assert!(Arc::ptr_eq(&store.get_state(), &initial));
        assert!(Arc::ptr_eq(&store.get_state(), &store.get_state()));
    }

    #[test]
    fn test_default_initial_state() {
        let store: Store<Counter, Action> = Store::new(counter_reducer);
        assert_eq!(*store.get_state(), Counter::default());
    }

    #[test]
    fn test_dispatch_folds_actions() {
        let store = create_store(counter_reducer, Counter::default());
        store.dispatch(Action::new("inc")).unwrap();
        store.dispatch(Action::new("inc")).unwrap();
        store.dispatch(Action::new("dec")).unwrap();
        store.dispatch(Action::new("unknown")).unwrap();
        assert_eq!(*store.get_state(), Counter { counter: 1 });
    }

    #[test]
    fn test_dispatch_returns_action() {
        let store = create_store(counter_reducer, Counter::default());
        let action = Action::with_payload("inc", serde_json::json!({ "by": 1 }));
        let returned = store.dispatch(action.clone()).unwrap();
        assert_eq!(returned, action);
    }

    #[test]
    fn test_reducer_called_once_with_current_state_and_action() {
        let calls: Arc<Mutex<Vec<(Counter, Action)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let store = create_store(
            move |state: &Counter, action: &Action| {
                log.lock().push((state.clone(), action.clone()));
                counter_reducer(state, action)
            },
            Counter::default(),
        );

        store.dispatch(Action::new("inc")).unwrap();
        store.dispatch(Action::new("x")).unwrap();

        assert_eq!(
            *calls.lock(),
            vec![
                (Counter { counter: 0 }, Action::new("inc")),
                (Counter { counter: 1 }, Action::new("x")),
            ]
        );
    }

    #[test]
    fn test_subscribers_notified_in_registration_order() {
        let store = create_store(counter_reducer, Counter::default());
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe_fn(move |state: &Counter| order.lock().push((name, state.counter)));
        }

        store.dispatch(Action::new("inc")).unwrap();

        assert_eq!(
            *order.lock(),
            vec![("first", 1), ("second", 1), ("third", 1)]
        );
    }

    #[test]
    fn test_subscriber_sees_committed_state() {
        let store = create_store(counter_reducer, Counter::default());
        let handle = store.clone();
        let matched = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&matched);
        store.subscribe_fn(move |state: &Counter| {
            if *handle.get_state() == *state {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.dispatch(Action::new("inc")).unwrap();
        store.dispatch(Action::new("inc")).unwrap();

        assert_eq!(matched.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = create_store(counter_reducer, Counter::default());
        let (seen, subscriber) = recorder::<Counter>();
        let unsubscribe = store.subscribe(subscriber);

        store.dispatch(Action::new("inc")).unwrap();
        unsubscribe.unsubscribe();
        store.dispatch(Action::new("inc")).unwrap();

        assert_eq!(*seen.lock(), vec![Counter { counter: 1 }]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_targeted() {
        let store = create_store(counter_reducer, Counter::default());
        let (first_seen, first) = recorder::<Counter>();
        let (second_seen, second) = recorder::<Counter>();
        let unsubscribe_first = store.subscribe(first);
        store.subscribe(second);

        unsubscribe_first.unsubscribe();
        unsubscribe_first.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);

        store.dispatch(Action::new("inc")).unwrap();
        assert!(first_seen.lock().is_empty());
        assert_eq!(second_seen.lock().len(), 1);
    }

    #[test]
    fn test_stale_handle_does_not_remove_new_registration() {
        let store = create_store(counter_reducer, Counter::default());
        let (seen, subscriber) = recorder::<Counter>();
        let old = store.subscribe(Arc::clone(&subscriber));
        old.unsubscribe();
        store.subscribe(subscriber);

        old.unsubscribe();
        store.dispatch(Action::new("inc")).unwrap();

        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_same_subscriber_registered_once() {
        let store = create_store(counter_reducer, Counter::default());
        let (seen, subscriber) = recorder::<Counter>();
        let first = store.subscribe(Arc::clone(&subscriber));
        let second = store.subscribe(Arc::clone(&subscriber));
        assert_eq!(store.subscriber_count(), 1);

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(seen.lock().len(), 1);

        // both handles refer to the single registration
        second.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        first.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_during_dispatch_applies_to_next_round() {
        let store = create_store(counter_reducer, Counter::default());
        let (late_seen, late) = recorder::<Counter>();
        let handle = store.clone();
        store.subscribe_fn(move |_state: &Counter| {
            handle.subscribe(Arc::clone(&late));
        });

        store.dispatch(Action::new("inc")).unwrap();
        assert!(late_seen.lock().is_empty());

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(*late_seen.lock(), vec![Counter { counter: 2 }]);
    }

    #[test]
    fn test_subscribe_from_reducer_applies_to_next_round() {
        let slot: Arc<Mutex<Option<Store<Counter, Action>>>> = Arc::new(Mutex::new(None));
        let (late_seen, late) = recorder::<Counter>();
        let inner_slot = Arc::clone(&slot);
        let store = create_store(
            move |state: &Counter, action: &Action| {
                if action.is("inc") {
                    let store = inner_slot.lock().clone();
                    if let Some(store) = store {
                        store.subscribe(Arc::clone(&late));
                    }
                }
                counter_reducer(state, action)
            },
            Counter::default(),
        );
        *slot.lock() = Some(store.clone());

        store.dispatch(Action::new("inc")).unwrap();
        assert!(late_seen.lock().is_empty());
        assert_eq!(store.subscriber_count(), 1);

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(*late_seen.lock(), vec![Counter { counter: 2 }]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_applies_to_next_round() {
        let store = create_store(counter_reducer, Counter::default());
        let (seen, victim) = recorder::<Counter>();
        let victim_handle: Arc<Mutex<Option<Unsubscribe>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&victim_handle);
        store.subscribe_fn(move |_state: &Counter| {
            if let Some(handle) = slot.lock().as_ref() {
                handle.unsubscribe();
            }
        });
        *victim_handle.lock() = Some(store.subscribe(victim));

        // snapshot taken before the first subscriber removed the victim
        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(seen.lock().len(), 1);

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_replace_reducer_takes_effect_on_next_dispatch() {
        let store = create_store(counter_reducer, Counter::default());
        let (seen, subscriber) = recorder::<Counter>();
        store.subscribe(subscriber);

        store.dispatch(Action::new("inc")).unwrap();
        store.replace_reducer(|state: &Counter, _action: &Action| Counter {
            counter: state.counter * 10,
        });
        assert_eq!(*store.get_state(), Counter { counter: 1 });
        assert_eq!(seen.lock().len(), 1);

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(*store.get_state(), Counter { counter: 10 });
    }

    #[test]
    fn test_reentrant_dispatch_from_subscriber_is_rejected() {
        let store = create_store(counter_reducer, Counter::default());
        let handle = store.clone();
        let outcome = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&outcome);
        store.subscribe_fn(move |_state: &Counter| {
            let result = handle.dispatch(Action::new("inc"));
            *slot.lock() = Some(matches!(result, Err(StoreError::ReentrantDispatch)));
        });

        store.dispatch(Action::new("inc")).unwrap();

        assert_eq!(*outcome.lock(), Some(true));
        assert_eq!(*store.get_state(), Counter { counter: 1 });
        assert!(!store.is_dispatching());
    }

    #[test]
    fn test_reentrant_dispatch_from_reducer_is_rejected() {
        let slot: Arc<Mutex<Option<Store<Counter, Action>>>> = Arc::new(Mutex::new(None));
        let inner_slot = Arc::clone(&slot);
        let store = create_store(
            move |state: &Counter, action: &Action| {
                if action.is("nested") {
                    let store = inner_slot.lock().clone();
                    if let Some(store) = store {
                        assert!(store.is_dispatching());
                        assert!(matches!(
                            store.dispatch(Action::new("inc")),
                            Err(StoreError::ReentrantDispatch)
                        ));
                    }
                }
                counter_reducer(state, action)
            },
            Counter::default(),
        );
        *slot.lock() = Some(store.clone());

        store.dispatch(Action::new("nested")).unwrap();
        assert_eq!(*store.get_state(), Counter { counter: 0 });
        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(*store.get_state(), Counter { counter: 1 });
    }

    #[test]
    fn test_reducer_panic_leaves_state_unchanged() {
        let store = create_store(
            |state: &Counter, action: &Action| {
                if action.is("boom") {
                    panic!("reducer failure");
                }
                counter_reducer(state, action)
            },
            Counter::default(),
        );
        let (seen, subscriber) = recorder::<Counter>();
        store.subscribe(subscriber);
        store.dispatch(Action::new("inc")).unwrap();
        let before = store.get_state();

        let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(Action::new("boom"))));

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&store.get_state(), &before));
        assert_eq!(seen.lock().len(), 1);
        assert!(!store.is_dispatching());

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(*store.get_state(), Counter { counter: 2 });
    }

    #[test]
    fn test_subscriber_panic_aborts_remaining_notifications() {
        let store = create_store(counter_reducer, Counter::default());
        let (first_seen, first) = recorder::<Counter>();
        let (last_seen, last) = recorder::<Counter>();
        store.subscribe(first);
        store.subscribe_fn(|state: &Counter| {
            if state.counter == 1 {
                panic!("subscriber failure");
            }
        });
        store.subscribe(last);

        let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(Action::new("inc"))));

        assert!(result.is_err());
        assert_eq!(*store.get_state(), Counter { counter: 1 });
        assert_eq!(first_seen.lock().len(), 1);
        assert!(last_seen.lock().is_empty());

        store.dispatch(Action::new("inc")).unwrap();
        assert_eq!(first_seen.lock().len(), 2);
        assert_eq!(*last_seen.lock(), vec![Counter { counter: 2 }]);
    }

    #[test]
    fn test_independent_stores_do_not_interfere() {
        let a = create_store(counter_reducer, Counter::default());
        let b = create_store(counter_reducer, Counter::default());
        let (seen, subscriber) = recorder::<Counter>();
        b.subscribe(subscriber);

        a.dispatch(Action::new("inc")).unwrap();

        assert_eq!(*a.get_state(), Counter { counter: 1 });
        assert_eq!(*b.get_state(), Counter { counter: 0 });
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_concurrent_dispatches_are_serialized() {
        let store = create_store(counter_reducer, Counter::default());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.dispatch(Action::new("inc")).unwrap();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(store.get_state().counter, 800);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped() {
        let store = create_store(counter_reducer, Counter::default());
        let unsubscribe = store.subscribe_fn(|_state: &Counter| {});
        drop(store);
        unsubscribe.unsubscribe();
    }
}
