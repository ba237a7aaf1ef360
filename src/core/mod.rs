//! Generic state machine building blocks.
//!
//! This module holds the domain-independent pieces the readiness machine is
//! assembled from:
//! - State definitions via the `State` trait
//! - Guard predicates over the current state
//! - Bounded history of committed transitions
//!
//! Nothing here schedules timers or notifies anyone; that lives in
//! [`crate::machine`].

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
