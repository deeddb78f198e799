use serde_json::{json, Value};
use unistore::Action;

use crate::actions::{TODO_ADD, TODO_CLEAR, TODO_TOGGLE};

/// Todo slice reducer
///
/// The slice is an array of `{ "title": string, "done": bool }`.
pub fn reduce(slice: Option<&Value>, action: &Action) -> Value {
    let mut todos = slice
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    match (action.kind.as_str(), &action.payload) {
        (TODO_ADD, Some(Value::String(title))) => {
            todos.push(json!({ "title": title, "done": false }));
        }
        (TODO_TOGGLE, Some(index)) => {
            let todo = index
                .as_u64()
                .and_then(|index| todos.get_mut(index as usize))
                .and_then(Value::as_object_mut);
            match todo {
                Some(todo) => {
                    let done = todo.get("done").and_then(Value::as_bool).unwrap_or(false);
                    todo.insert("done".to_string(), Value::Bool(!done));
                }
                None => log::debug!("todo_reducer: no todo at {}", index),
            }
        }
        (TODO_CLEAR, _) => todos.retain(|todo| !todo["done"].as_bool().unwrap_or(false)),
        _ => {}
    }

    Value::Array(todos)
}

/// Number of todos in a slice value
pub fn count(slice: Option<&Value>) -> usize {
    slice.and_then(Value::as_array).map_or(0, Vec::len)
}
