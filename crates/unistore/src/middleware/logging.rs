use log::Level;

use crate::action::ActionType;
use crate::error::DispatchResult;
use crate::middleware::{Dispatch, Middleware};
use crate::store::Store;

/// LoggingMiddleware - logs all actions passing through
///
/// Always forwards the action; logs its type before forwarding and the
/// outcome afterwards. Actions whose type is in the ignore list are passed
/// through silently.
pub struct LoggingMiddleware {
    level: Level,
    ignored: Vec<String>,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self {
            level: Level::Debug,
            ignored: Vec::new(),
        }
    }

    /// Log at `level` instead of `Debug`
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Don't log actions of this type
    pub fn ignore(mut self, action_type: impl Into<String>) -> Self {
        self.ignored.push(action_type.into());
        self
    }

    fn is_ignored(&self, action_type: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == action_type)
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    A: ActionType,
{
    fn handle(&self, _store: &Store<S, A>, next: &Dispatch<A>, action: A) -> DispatchResult<A> {
        let action_type = action.action_type().to_string();
        if self.is_ignored(&action_type) {
            return next(action);
        }

        log::log!(self.level, "Action: {}", action_type);
        let result = next(action);
        match &result {
            Ok(returned) => log::log!(
                self.level,
                "{}",
                done_message(&action_type, returned.action_type())
            ),
            Err(e) => log::warn!("Action: {} failed: {}", action_type, e),
        }
        result
    }

    fn name(&self) -> &str {
        "logging"
    }
}

/// Names the resulting action when an inner stage transformed it
fn done_message(dispatched: &str, resulting: &str) -> String {
    if dispatched == resulting {
        format!("Action: {} done", dispatched)
    } else {
        format!("Action: {} done as {}", dispatched, resulting)
    }
}
