//! Readiness: a guarded state machine for "is the device ready?" checks
//!
//! A single [`ReadinessMachine`] tracks camera permission, device
//! orientation and face presence, and decides when a test may start.
//! Sensor and UI code report what they observe; the machine ignores events
//! that make no sense in the current state, debounces the "hold still"
//! phase, and tells every subscribed [`StateListener`] about each committed
//! change.
//!
//! # Core Concepts
//!
//! - **State**: [`ReadinessState`], generated with [`state_enum!`]
//! - **Guards**: each event is only accepted from an explicit set of states
//! - **Debounce**: entering `WaitingAngle` schedules a confirmation on tokio;
//!   leaving it, or pausing, cancels the confirmation
//! - **Views**: [`PanelView`] picks the panel to show for a state
//!
//! # Example
//!
//! ```rust
//! use readiness::{ReadinessConfig, ReadinessMachine, ReadinessState, StateListener};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> readiness::Result<()> {
//! let machine = ReadinessMachine::new(ReadinessConfig::default())?;
//! machine.subscribe(Arc::new(|state: ReadinessState| println!("now {state}")));
//! machine.on_resume()?;
//!
//! machine.report_permission_granted();
//! machine.report_bad_angle();
//! machine.report_good_angle();
//! assert_eq!(machine.current_state(), ReadinessState::WaitingAngle);
//!
//! // Default debounce is 1500 ms
//! tokio::time::sleep(Duration::from_millis(1600)).await;
//! assert_eq!(machine.current_state(), ReadinessState::ConfirmedAngle);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod listener;
pub mod machine;
pub mod signals;
pub mod timer;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigViolation, ReadinessConfig};
pub use core::{Guard, State, StateHistory, StateTransition};
pub use error::{ReadinessError, Result};
pub use listener::{ListenerRegistry, StateListener};
pub use machine::{ReadinessEvent, ReadinessMachine, ReadinessState, TransitionOutcome};
pub use signals::{AngleClass, FacePresence, OrientationSample};
pub use view::PanelView;
