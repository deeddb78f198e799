//! Todo Limit Middleware
//!
//! Rejects `todo/add` once the todo slice holds `max` entries. Reads the
//! current state from the store before deciding whether to forward.

use unistore::{Action, Dispatch, DispatchResult, Middleware, Store, StoreError};

use crate::actions::TODO_ADD;
use crate::reducers::{todo_reducer, AppState, TODOS};

pub struct TodoLimitMiddleware {
    max: usize,
}

impl TodoLimitMiddleware {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Middleware<AppState, Action> for TodoLimitMiddleware {
    fn handle(
        &self,
        store: &Store<AppState, Action>,
        next: &Dispatch<Action>,
        action: Action,
    ) -> DispatchResult<Action> {
        if action.is(TODO_ADD) {
            let count = todo_reducer::count(store.get_state().get(TODOS));
            if count >= self.max {
                log::debug!("TodoLimitMiddleware: {} of {} todos, rejecting", count, self.max);
                return Err(StoreError::rejected(
                    self.name(),
                    format!("todo list is full ({} items)", self.max),
                ));
            }
        }

        next(action)
    }

    fn name(&self) -> &str {
        "todo_limit"
    }
}
