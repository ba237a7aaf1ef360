//! Bounded history of committed transitions.
//!
//! The machine records every committed transition here so hosts can dump
//! recent activity into logs or bug reports. Old records are evicted once
//! the configured capacity is reached.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use readiness::core::StateTransition;
/// use readiness::ReadinessState;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: ReadinessState::BadAngle,
///     to: ReadinessState::WaitingAngle,
///     event: "report_good_angle".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.event, "report_good_angle");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the event that triggered the transition
    pub event: String,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of transitions.
///
/// # Example
///
/// ```rust
/// use readiness::core::{StateHistory, StateTransition};
/// use readiness::ReadinessState;
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(2);
/// for (from, to) in [
///     (ReadinessState::NoPermission, ReadinessState::Idle),
///     (ReadinessState::Idle, ReadinessState::BadAngle),
///     (ReadinessState::BadAngle, ReadinessState::WaitingAngle),
/// ] {
///     history.record(StateTransition {
///         from,
///         to,
///         event: "test".to_string(),
///         timestamp: Utc::now(),
///     });
/// }
///
/// // Oldest record was evicted
/// let path = history.get_path();
/// assert_eq!(path, vec![&ReadinessState::Idle, &ReadinessState::BadAngle, &ReadinessState::WaitingAngle]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    capacity: usize,
    transitions: VecDeque<StateTransition<S>>,
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most `capacity` records.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the `from` of the oldest retained record, then the
    /// `to` of each record in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
