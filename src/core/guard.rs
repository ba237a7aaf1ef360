//! Guard predicates for controlling state transitions.
//!
//! A guard is a pure precondition on the current state. The transition table
//! attaches one to every event; an event whose guard rejects the current
//! state is ignored.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// Guards are cheap to clone; the predicate is shared.
///
/// # Example
///
/// ```rust
/// use readiness::core::Guard;
/// use readiness::ReadinessState;
///
/// let only_bad_angle = Guard::new(|s: &ReadinessState| *s == ReadinessState::BadAngle);
///
/// assert!(only_bad_angle.check(&ReadinessState::BadAngle));
/// assert!(!only_bad_angle.check(&ReadinessState::Idle));
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

    /// Guard that admits every state.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Guard that admits exactly the listed states.
    pub fn any_of(states: &[S]) -> Self
    where
        S: 'static,
    {
        let allowed = states.to_vec();
        Self::new(move |s| allowed.contains(s))
    }

    /// Guard that admits every state except the listed ones.
    pub fn none_of(states: &[S]) -> Self
    where
        S: 'static,
    {
        let denied = states.to_vec();
        Self::new(move |s| !denied.contains(s))
    }

    /// Check if the guard allows a transition from this state.
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
