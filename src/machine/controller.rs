//! The readiness controller shared by every screen of the host app.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

use crate::config::ReadinessConfig;
use crate::core::{StateHistory, StateTransition};
use crate::error::{ReadinessError, Result};
use crate::listener::{ListenerRegistry, StateListener};
use crate::machine::state::{ReadinessEvent, ReadinessState};
use crate::machine::transition::TransitionTable;
use crate::signals::{AngleClass, FacePresence, OrientationSample};
use crate::timer::{ConfirmationId, DebounceTimer};
use crate::view::PanelView;

/// Result of delivering one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The guard passed and the new state was committed
    Transitioned {
        from: ReadinessState,
        to: ReadinessState,
    },

    /// The guard rejected the event; nothing changed
    Ignored { state: ReadinessState },
}

impl TransitionOutcome {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// State of the machine right after the event was handled.
    pub fn state(&self) -> ReadinessState {
        match self {
            Self::Transitioned { to, .. } => *to,
            Self::Ignored { state } => *state,
        }
    }
}

struct Core {
    state: ReadinessState,
    timer: DebounceTimer,
    history: StateHistory<ReadinessState>,
    /// Committed states not yet delivered to listeners, in commit order
    outbox: VecDeque<ReadinessState>,
    delivering: bool,
}

struct Shared {
    config: ReadinessConfig,
    table: TransitionTable<ReadinessState, ReadinessEvent>,
    core: Mutex<Core>,
    listeners: ListenerRegistry,
}

/// Guarded state machine for the readiness check.
///
/// Cloning produces another handle to the same machine. Every event method
/// takes the internal lock, evaluates the guard, commits, and re-evaluates
/// the debounce timer as one step; listeners are called after the lock is
/// released, in commit order.
///
/// # Example
///
/// ```rust
/// use readiness::{ReadinessConfig, ReadinessMachine, ReadinessState};
///
/// let machine = ReadinessMachine::new(ReadinessConfig::default()).unwrap();
/// assert_eq!(machine.current_state(), ReadinessState::NoPermission);
///
/// machine.report_permission_granted();
/// assert_eq!(machine.current_state(), ReadinessState::Idle);
///
/// // Guard requires BadAngle first
/// assert!(!machine.report_good_angle().is_transitioned());
/// assert_eq!(machine.report_bad_angle().state(), ReadinessState::BadAngle);
/// ```
#[derive(Clone)]
pub struct ReadinessMachine {
    shared: Arc<Shared>,
}

/// Resets the delivery flag if a listener panics mid-delivery, so later
/// commits can still be delivered.
struct DeliveryGuard<'a>(&'a Shared);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.core.lock().delivering = false;
        }
    }
}

impl ReadinessMachine {
    /// Validate `config` and build a machine in `NoPermission`.
    pub fn new(config: ReadinessConfig) -> Result<Self> {
        Self::with_initial_state(config, ReadinessState::default())
    }

    /// Build a machine starting in `initial`, for hosts restoring a screen.
    ///
    /// No confirmation is scheduled at construction, even for
    /// `WaitingAngle`; the timer starts disarmed.
    pub fn with_initial_state(config: ReadinessConfig, initial: ReadinessState) -> Result<Self> {
        config.validate()?;

        let core = Core {
            state: initial,
            timer: DebounceTimer::new(config.debounce()),
            history: StateHistory::with_capacity(config.history_capacity),
            outbox: VecDeque::new(),
            delivering: false,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                table: TransitionTable::readiness(),
                core: Mutex::new(core),
                listeners: ListenerRegistry::new(),
            }),
        })
    }

    // ---- events -------------------------------------------------------

    /// Device orientation left the tolerance window.
    pub fn report_bad_angle(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::ReportBadAngle)
    }

    /// Device orientation is within tolerance; starts the hold-still countdown.
    pub fn report_good_angle(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::ReportGoodAngle)
    }

    /// "Next" pressed after the angle was confirmed.
    pub fn advance_from_button(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::AdvanceFromButton)
    }

    pub fn face_detected(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::FaceDetected)
    }

    /// No face in the last detection cycle, or detection was cancelled.
    pub fn face_lost(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::FaceLost)
    }

    /// "Start test" pressed.
    pub fn begin_test(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::BeginTest)
    }

    /// Platform failure. Always accepted.
    pub fn report_error(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::ReportError)
    }

    /// Camera permission missing. Ignored while a test is running.
    pub fn report_no_permission(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::ReportNoPermission)
    }

    /// Permission available again; leaves `NoPermission` or `Error` for `Idle`.
    pub fn report_permission_granted(&self) -> TransitionOutcome {
        self.dispatch(ReadinessEvent::ReportPermissionGranted)
    }

    // ---- classified inputs --------------------------------------------

    /// Classify a sensor sample against the configured tolerances and
    /// forward the matching angle event.
    pub fn report_orientation(&self, sample: OrientationSample) -> TransitionOutcome {
        match sample.classify(&self.shared.config) {
            AngleClass::Good => self.report_good_angle(),
            AngleClass::Bad => self.report_bad_angle(),
        }
    }

    /// Forward the result of one face-detection cycle.
    pub fn report_faces(&self, count: usize) -> TransitionOutcome {
        match FacePresence::from_count(count) {
            FacePresence::Present => self.face_detected(),
            FacePresence::Absent => self.face_lost(),
        }
    }

    /// Forward the result of a permission check.
    pub fn report_permission(&self, granted: bool) -> TransitionOutcome {
        if granted {
            self.report_permission_granted()
        } else {
            self.report_no_permission()
        }
    }

    // ---- lifecycle ----------------------------------------------------

    /// Host screen became visible: arm the debounce timer on the current
    /// tokio runtime.
    pub fn on_resume(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|err| {
            tracing::warn!("Resume outside a tokio runtime; debounce timer stays disarmed");
            ReadinessError::RuntimeUnavailable(err)
        })?;
        self.on_resume_with(runtime);
        Ok(())
    }

    /// Like [`on_resume`](Self::on_resume) with an explicit runtime.
    pub fn on_resume_with(&self, runtime: Handle) {
        let mut core = self.shared.core.lock();
        if core.timer.arm(runtime) {
            tracing::info!(state = %core.state, "Debounce timer armed");
        }
    }

    /// Host screen went away: cancel any pending confirmation and disarm.
    /// The current state is kept.
    pub fn on_pause(&self) {
        let mut core = self.shared.core.lock();
        let had_pending = core.timer.pending().is_some();
        if core.timer.disarm() {
            tracing::info!(
                state = %core.state,
                cancelled_confirmation = had_pending,
                "Debounce timer disarmed"
            );
        }
    }

    // ---- observers ----------------------------------------------------

    /// Register `listener`. Returns `false` if it was already registered.
    pub fn subscribe(&self, listener: Arc<dyn StateListener>) -> bool {
        self.shared.listeners.subscribe(listener)
    }

    /// Remove `listener`. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, listener: &Arc<dyn StateListener>) -> bool {
        self.shared.listeners.unsubscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }

    // ---- queries ------------------------------------------------------

    pub fn current_state(&self) -> ReadinessState {
        self.shared.core.lock().state
    }

    pub fn current_view(&self) -> PanelView {
        PanelView::for_state(self.current_state())
    }

    pub fn has_pending_confirmation(&self) -> bool {
        self.shared.core.lock().timer.pending().is_some()
    }

    /// Time left before the angle is confirmed, for a countdown indicator.
    pub fn confirmation_remaining(&self) -> Option<Duration> {
        self.shared.core.lock().timer.remaining()
    }

    pub fn is_armed(&self) -> bool {
        self.shared.core.lock().timer.is_armed()
    }

    /// Snapshot of recently committed transitions.
    pub fn history(&self) -> StateHistory<ReadinessState> {
        self.shared.core.lock().history.clone()
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.shared.config
    }

    // ---- internals ----------------------------------------------------

    fn dispatch(&self, event: ReadinessEvent) -> TransitionOutcome {
        let outcome = {
            let mut core = self.shared.core.lock();
            self.apply(&mut core, event)
        };

        if outcome.is_transitioned() {
            self.deliver();
        }
        outcome
    }

    /// Guard, commit, record, enqueue and re-evaluate the timer. Caller
    /// holds the lock.
    fn apply(&self, core: &mut Core, event: ReadinessEvent) -> TransitionOutcome {
        let from = core.state;
        let Some(to) = self.shared.table.resolve(&from, &event) else {
            tracing::trace!(state = %from, event = %event, "Event ignored by guard");
            return TransitionOutcome::Ignored { state: from };
        };

        core.state = to;
        core.history.record(StateTransition {
            from,
            to,
            event: event.name().to_string(),
            timestamp: Utc::now(),
        });
        core.outbox.push_back(to);
        tracing::debug!(from = %from, to = %to, event = %event, "Readiness transition");

        self.update_timer(core, to);
        TransitionOutcome::Transitioned { from, to }
    }

    fn update_timer(&self, core: &mut Core, entered: ReadinessState) {
        if entered != ReadinessState::WaitingAngle {
            if core.timer.cancel() {
                tracing::debug!(state = %entered, "Pending angle confirmation cancelled");
            }
            return;
        }

        let machine: Weak<Shared> = Arc::downgrade(&self.shared);
        let scheduled = core.timer.schedule(move |id| {
            if let Some(shared) = machine.upgrade() {
                ReadinessMachine { shared }.fire_confirmation(id);
            }
        });

        match scheduled {
            Some(id) => tracing::debug!(
                confirmation = %id,
                delay_ms = core.timer.delay().as_millis() as u64,
                "Angle confirmation scheduled"
            ),
            None => tracing::debug!("Debounce timer disarmed; angle confirmation not scheduled"),
        }
    }

    /// Timer callback. Serialized like any other event; stale ids are dropped
    /// and the `WaitingAngle` guard still applies.
    fn fire_confirmation(&self, id: ConfirmationId) -> TransitionOutcome {
        let outcome = {
            let mut core = self.shared.core.lock();
            if !core.timer.complete(id) {
                tracing::trace!(confirmation = %id, "Stale angle confirmation dropped");
                return TransitionOutcome::Ignored { state: core.state };
            }
            self.apply(&mut core, ReadinessEvent::ConfirmAngle)
        };

        if outcome.is_transitioned() {
            self.deliver();
        }
        outcome
    }

    /// Drain the outbox to listeners. Only one caller drains at a time;
    /// anyone committing meanwhile (including a listener reacting to a
    /// notification) just enqueues and the active drainer delivers it.
    fn deliver(&self) {
        {
            let mut core = self.shared.core.lock();
            if core.delivering {
                return;
            }
            core.delivering = true;
        }

        let _guard = DeliveryGuard(&self.shared);
        loop {
            let next = {
                let mut core = self.shared.core.lock();
                match core.outbox.pop_front() {
                    Some(state) => state,
                    None => {
                        core.delivering = false;
                        return;
                    }
                }
            };
            self.shared.listeners.notify(next);
        }
    }
}

impl std::fmt::Debug for ReadinessMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("ReadinessMachine")
            .field("state", &core.state)
            .field("timer", &core.timer)
            .field("listeners", &self.shared.listeners)
            .finish()
    }
}
