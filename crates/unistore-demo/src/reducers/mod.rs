use serde_json::Value;
use unistore::{Action, CombinedReducer, SliceMap};

pub mod counter_reducer;
pub mod todo_reducer;

pub const COUNTER: &str = "counter";
pub const TODOS: &str = "todos";

pub type AppState = SliceMap<String, Value>;

/// Root reducer: one slice per feature
pub fn root_reducer() -> CombinedReducer<String, Value, Action> {
    CombinedReducer::new()
        .slice(COUNTER, counter_reducer::reduce)
        .slice(TODOS, todo_reducer::reduce)
}

/// State before the first action, with the counter preset
pub fn initial_state(initial_counter: i64) -> AppState {
    let mut state = root_reducer().reduce_slices(None, &Action::new("@@init"));
    state.insert(COUNTER.to_string(), Value::from(initial_counter));
    state
}
