//! Readiness state machine: states, events, transition rules and the
//! controller that ties them to the debounce timer and listeners.

mod controller;
mod state;
mod transition;

pub use controller::{ReadinessMachine, TransitionOutcome};
pub use state::{ReadinessEvent, ReadinessState};
pub use transition::{Transition, TransitionTable};
