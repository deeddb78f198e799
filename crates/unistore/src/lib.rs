//! # unistore
//!
//! A minimal unidirectional state container.
//!
//! A single state value lives inside a [`Store`] and changes only when an
//! action is dispatched: the store runs the active [`Reducer`] over the
//! current state and the action, commits the result, and then notifies its
//! subscribers in registration order.
//!
//! ```text
//! Action → Middleware Chain → Reducer → State → Subscribers
//! ```
//!
//! Two helpers compose around the store:
//!
//! - [`combine_reducers`] builds one reducer over a keyed state shape from
//!   independent per-slice reducers.
//! - [`apply_middleware`] wraps the store's dispatch in a chain of
//!   interceptors, first declared = outermost.
//!
//! ## Example
//!
//! ```rust
//! use unistore::{create_store, Action};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! let store = create_store(
//!     |state: &Counter, action: &Action| match action.kind.as_str() {
//!         "inc" => Counter { value: state.value + 1 },
//!         _ => state.clone(),
//!     },
//!     Counter::default(),
//! );
//!
//! store.dispatch(Action::new("inc"))?;
//! store.dispatch(Action::new("inc"))?;
//! assert_eq!(store.get_state().value, 2);
//! # Ok::<(), unistore::StoreError>(())
//! ```

pub mod action;
pub mod combine;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

pub use action::{Action, ActionType};
pub use combine::{combine_reducers, CombinedReducer, SliceMap, SliceReducer};
pub use error::{DispatchResult, StoreError};
pub use middleware::{apply_middleware, logging::LoggingMiddleware, Dispatch, EnhancedStore, Middleware};
pub use reducer::Reducer;
pub use store::{create_store, Store, Subscriber, Unsubscribe};
