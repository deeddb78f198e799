//! Reducer composition across independent state slices
//!
//! A [`CombinedReducer`] owns one [`SliceReducer`] per key. For every action it
//! runs each of them exactly once, in the order the slices were added, on the
//! value stored under its own key, and assembles the results into a fresh
//! [`SliceMap`]. Keys without a slice reducer are dropped from the result.

use std::collections::BTreeMap;
use std::fmt;

use crate::reducer::Reducer;

/// Keyed state shape produced by a [`CombinedReducer`]
pub type SliceMap<K, V> = BTreeMap<K, V>;

/// Reducer for a single slice
///
/// Receives `None` when the slice does not exist yet and must then supply its
/// own default.
pub trait SliceReducer<V, A>: Send + Sync {
    fn reduce(&self, slice: Option<&V>, action: &A) -> V;
}

impl<V, A, F> SliceReducer<V, A> for F
where
    F: Fn(Option<&V>, &A) -> V + Send + Sync,
{
    fn reduce(&self, slice: Option<&V>, action: &A) -> V {
        self(slice, action)
    }
}

/// One reducer over a keyed state shape, built from per-key reducers
pub struct CombinedReducer<K, V, A> {
    slices: Vec<(K, Box<dyn SliceReducer<V, A>>)>,
}

impl<K, V, A> CombinedReducer<K, V, A>
where
    K: Ord + Clone,
{
    pub fn new() -> Self {
        Self { slices: Vec::new() }
    }

    /// Add a slice reducer under `key`
    ///
    /// Adding a key twice keeps its original position and uses the latest
    /// reducer.
    pub fn slice<R>(mut self, key: impl Into<K>, reducer: R) -> Self
    where
        R: SliceReducer<V, A> + 'static,
    {
        self.insert(key.into(), Box::new(reducer));
        self
    }

    fn insert(&mut self, key: K, reducer: Box<dyn SliceReducer<V, A>>) {
        match self.slices.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = reducer,
            None => self.slices.push((key, reducer)),
        }
    }

    /// Keys in invocation order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.slices.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Reduce every slice of `state`
    ///
    /// `None` stands for "no state yet": every slice reducer then receives
    /// `None` for its slice.
    pub fn reduce_slices(&self, state: Option<&SliceMap<K, V>>, action: &A) -> SliceMap<K, V> {
        self.slices
            .iter()
            .map(|(key, reducer)| {
                let slice = state.and_then(|state| state.get(key));
                (key.clone(), reducer.reduce(slice, action))
            })
            .collect()
    }
}

impl<K, V, A> Default for CombinedReducer<K, V, A>
where
    K: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A> Reducer<SliceMap<K, V>, A> for CombinedReducer<K, V, A>
where
    K: Ord + Clone + Send + Sync,
{
    fn reduce(&self, state: &SliceMap<K, V>, action: &A) -> SliceMap<K, V> {
        self.reduce_slices(Some(state), action)
    }
}

impl<K: fmt::Debug, V, A> fmt::Debug for CombinedReducer<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slices.iter().map(|(key, _)| key))
            .finish()
    }
}

/// Build a [`CombinedReducer`] from `(key, reducer)` pairs
///
/// Slice reducers are invoked in iteration order of `reducers`. All pairs
/// share one reducer type (fn items of one signature, or closures from one
/// factory); mix closure types with [`CombinedReducer::slice`] instead.
pub fn combine_reducers<K, V, A, R, I>(reducers: I) -> CombinedReducer<K, V, A>
where
    K: Ord + Clone,
    R: SliceReducer<V, A> + 'static,
    I: IntoIterator<Item = (K, R)>,
{
    let mut combined = CombinedReducer::new();
    for (key, reducer) in reducers {
        combined.insert(key, Box::new(reducer));
    }
    combined
}
