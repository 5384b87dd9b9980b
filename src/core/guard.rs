//! Guard predicates for gating workflow triggers.
//!
//! A guard decides whether the controller may start an operation from the
//! current state. Guards hold no data of their own and never mutate anything.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure predicate over a state.
///
/// Guards are cheap to clone (the predicate is shared) so a single guard can
/// be reused by every operation that needs the same gate.
///
/// # Example
///
/// ```rust
/// use snapid::core::{Guard, State};
/// use snapid::machine::WorkflowState;
///
/// let idle_only = Guard::new(|s: &WorkflowState| !s.is_pending());
///
/// assert!(idle_only.check(&WorkflowState::Ready));
/// assert!(!idle_only.check(&WorkflowState::Classifying));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that only passes when no operation is in flight.
    pub fn idle() -> Self
    where
        S: 'static,
    {
        Self::new(|s: &S| !s.is_pending())
    }

    /// Guard that passes when the state matches any of `allowed`.
    pub fn one_of(allowed: Vec<S>) -> Self
    where
        S: 'static,
    {
        Self::new(move |s: &S| allowed.contains(s))
    }

    /// Check if the guard allows leaving this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            _phantom: PhantomData,
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
