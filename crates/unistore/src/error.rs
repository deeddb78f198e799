//! Error types surfaced by dispatch

use thiserror::Error;

/// Errors a dispatch call can fail with
#[derive(Debug, Error)]
pub enum StoreError {
    /// `dispatch` was called again on the same store (from the reducer or
    /// from a subscriber) before the outer dispatch finished
    #[error("re-entrant dispatch: the store is already dispatching")]
    ReentrantDispatch,

    /// A middleware refused to forward an action
    #[error("middleware `{middleware}` rejected action: {reason}")]
    Rejected { middleware: String, reason: String },
}

impl StoreError {
    /// Build a [`StoreError::Rejected`] for the given middleware
    pub fn rejected(middleware: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            middleware: middleware.into(),
            reason: reason.into(),
        }
    }
}

/// Result of a dispatch: the action that was dispatched, echoed back
pub type DispatchResult<A> = Result<A, StoreError>;
