use serde_json::Value;
use unistore::Action;

use crate::actions::{COUNTER_DEC, COUNTER_INC, COUNTER_RESET};

/// Counter slice reducer; the slice defaults to 0
pub fn reduce(slice: Option<&Value>, action: &Action) -> Value {
    let value = slice.and_then(Value::as_i64).unwrap_or(0);

    let next = match action.kind.as_str() {
        COUNTER_INC => value + step(action),
        COUNTER_DEC => value - step(action),
        COUNTER_RESET => 0,
        _ => value,
    };

    Value::from(next)
}

/// Optional numeric payload, 1 otherwise
fn step(action: &Action) -> i64 {
    action
        .payload
        .as_ref()
        .and_then(Value::as_i64)
        .unwrap_or(1)
}
