//! Conversion of scripted config lines into store actions
//!
//! Action types are prefixed by the slice they affect:
//! - `counter/inc`, `counter/dec`, `counter/reset`
//! - `todo/add:<title>`, `todo/toggle:<index>`, `todo/clear`

use serde_json::Value;
use unistore::Action;
use unistore_config::ScriptedAction;

pub const COUNTER_INC: &str = "counter/inc";
pub const COUNTER_DEC: &str = "counter/dec";
pub const COUNTER_RESET: &str = "counter/reset";
pub const TODO_ADD: &str = "todo/add";
pub const TODO_TOGGLE: &str = "todo/toggle";
pub const TODO_CLEAR: &str = "todo/clear";

/// Numeric payloads become JSON numbers, everything else a string
pub fn from_scripted(scripted: &ScriptedAction) -> Action {
    match &scripted.payload {
        None => Action::new(scripted.kind.as_str()),
        Some(payload) => {
            let value = payload
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(payload.as_str()));
            Action::with_payload(scripted.kind.as_str(), value)
        }
    }
}
