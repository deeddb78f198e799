//! Reducer - pure function that produces new state from current state + action

/// A pure transformation `(state, action) -> new state`
///
/// Implementations must not depend on anything besides `state` and `action`.
/// Closures of the shape `Fn(&S, &A) -> S` implement this trait.
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S + Send + Sync,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}
