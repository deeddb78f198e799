//! Middleware system for Redux architecture
//!
//! Middleware sits between action dispatch and reducer execution, allowing
//! logging, validation and other cross-cutting concerns to be handled in a
//! composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch(action) → m1 → m2 → … → Store::dispatch → Reducer → State
//! ```
//!
//! Each middleware can:
//! - Inspect the action and the current state of the original store
//! - Forward the action (possibly transformed) to `next`
//! - Short-circuit by returning without calling `next`
//! - Fail the dispatch by returning an error
//!
//! ## Example
//!
//! ```rust
//! use unistore::{apply_middleware, create_store, Dispatch, DispatchResult, Store, StoreError};
//!
//! let store = create_store(|state: &i64, action: &i64| state + action, 0i64);
//!
//! let no_negatives = |_store: &Store<i64, i64>, next: &Dispatch<i64>, action: i64| -> DispatchResult<i64> {
//!     if action < 0 {
//!         return Err(StoreError::rejected("no_negatives", "negative step"));
//!     }
//!     next(action)
//! };
//!
//! let store = apply_middleware(store, vec![Box::new(no_negatives)]);
//! store.dispatch(5)?;
//! assert!(store.dispatch(-1).is_err());
//! assert_eq!(*store.get_state(), 5);
//! # Ok::<(), StoreError>(())
//! ```

pub mod logging;

use std::fmt;
use std::sync::Arc;

use crate::error::DispatchResult;
use crate::reducer::Reducer;
use crate::store::{Store, Subscriber, Unsubscribe};

/// A dispatch function: the store's own, or any stage of a middleware chain
pub type Dispatch<A> = Arc<dyn Fn(A) -> DispatchResult<A> + Send + Sync>;

/// Middleware trait - intercepts actions before they reach the store
///
/// `handle` is called once per dispatch that reaches this stage of the
/// chain.
///
/// # Parameters
/// - `store`: the original (unwrapped) store, for reading current state
/// - `next`: the next stage; the last middleware's `next` is the store's own dispatch
/// - `action`: the action being dispatched
///
/// # Returns
/// What `next` returned when forwarding, or any value/error of the
/// middleware's choosing when short-circuiting. Calling `next` more than once
/// dispatches more than once.
pub trait Middleware<S, A>: Send + Sync {
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> DispatchResult<A>;

    /// Name used in logs and rejection errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S, A, F> Middleware<S, A> for F
where
    F: Fn(&Store<S, A>, &Dispatch<A>, A) -> DispatchResult<A> + Send + Sync,
{
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> DispatchResult<A> {
        self(store, next, action)
    }
}

/// Wrap `store`'s dispatch in `middlewares`
///
/// The first middleware in the list is the outermost: it runs first, and the
/// last one calls the store's own dispatch. Everything else on the returned
/// store operates on the same underlying `store`.
pub fn apply_middleware<S, A>(
    store: Store<S, A>,
    middlewares: Vec<Box<dyn Middleware<S, A>>>,
) -> EnhancedStore<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    let terminal = store.clone();
    let mut chain: Dispatch<A> = Arc::new(move |action| terminal.dispatch(action));

    for middleware in middlewares.into_iter().rev() {
        log::debug!("Middleware: wrapping dispatch with {}", middleware.name());
        let store = store.clone();
        let next = chain;
        chain = Arc::new(move |action| middleware.handle(&store, &next, action));
    }

    EnhancedStore {
        store,
        dispatch: chain,
    }
}

/// A store whose dispatch runs through a middleware chain
///
/// Returned by [`apply_middleware`]. Apart from `dispatch`, every method
/// forwards to the wrapped store.
pub struct EnhancedStore<S, A> {
    store: Store<S, A>,
    dispatch: Dispatch<A>,
}

impl<S, A> EnhancedStore<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    /// Dispatch through the middleware chain
    pub fn dispatch(&self, action: A) -> DispatchResult<A> {
        (self.dispatch)(action)
    }

    /// The composed dispatch function, e.g. to hand to other components
    pub fn dispatcher(&self) -> Dispatch<A> {
        Arc::clone(&self.dispatch)
    }

    pub fn get_state(&self) -> Arc<S> {
        self.store.get_state()
    }

    pub fn subscribe(&self, subscriber: Subscriber<S>) -> Unsubscribe {
        self.store.subscribe(subscriber)
    }

    pub fn subscribe_fn<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.store.subscribe_fn(subscriber)
    }

    pub fn replace_reducer<R>(&self, reducer: R)
    where
        R: Reducer<S, A> + 'static,
    {
        self.store.replace_reducer(reducer)
    }

    /// The original store, bypassing the middleware chain
    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }
}

impl<S, A> Clone for EnhancedStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for EnhancedStore<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhancedStore")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
