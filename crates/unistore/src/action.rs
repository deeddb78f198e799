//! Dynamic action value
//!
//! The store is generic over its action type, so applications are free to use
//! their own enums. [`Action`] is the untyped variant: a `type` discriminant
//! plus an optional payload of arbitrary shape.

use serde_json::Value;

/// Access to an action's discriminant, used for logging
pub trait ActionType {
    fn action_type(&self) -> &str;
}

/// An immutable message describing an intended state transition
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// The `type` discriminant
    pub kind: String,

    /// Optional payload, any JSON shape
    pub payload: Option<Value>,
}

impl Action {
    /// Action without payload
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Action carrying a payload
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// Returns true if this action's discriminant equals `kind`
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl ActionType for Action {
    fn action_type(&self) -> &str {
        &self.kind
    }
}

impl ActionType for String {
    fn action_type(&self) -> &str {
        self
    }
}

impl ActionType for &'static str {
    fn action_type(&self) -> &str {
        self
    }
}
