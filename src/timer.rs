//! Debounce timer for the "hold position" confirmation.
//!
//! The timer owns at most one [`PendingConfirmation`]. Scheduling spawns a
//! task on the armed tokio runtime that sleeps until the deadline and then
//! hands the confirmation id to a callback. Cancelling aborts that task.
//!
//! Aborting cannot stop a callback that has already started, so the receiver
//! must still check the id with [`DebounceTimer::complete`] (and its own
//! guards) before acting on a firing.

use std::fmt;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Identifies one scheduled confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfirmationId(u64);

impl fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "confirmation#{}", self.0)
    }
}

/// Token for a scheduled confirmation. Cancelling consumes it.
#[derive(Debug)]
pub struct PendingConfirmation {
    id: ConfirmationId,
    deadline: Instant,
    abort: AbortHandle,
}

impl PendingConfirmation {
    pub fn id(&self) -> ConfirmationId {
        self.id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the confirmation fires; zero once the deadline passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    fn cancel(self) {
        self.abort.abort();
    }
}

pub struct DebounceTimer {
    delay: Duration,
    runtime: Option<Handle>,
    pending: Option<PendingConfirmation>,
    next_id: u64,
}

impl DebounceTimer {
    /// Create a disarmed timer firing `delay` after each schedule.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            runtime: None,
            pending: None,
            next_id: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Enable scheduling on `runtime`. Returns `false` if already armed.
    pub fn arm(&mut self, runtime: Handle) -> bool {
        if self.runtime.is_some() {
            return false;
        }
        self.runtime = Some(runtime);
        true
    }

    /// Cancel any pending confirmation and stop scheduling until re-armed.
    /// Returns `false` if the timer was not armed.
    pub fn disarm(&mut self) -> bool {
        self.cancel();
        self.runtime.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.runtime.is_some()
    }

    /// Schedule `on_fire` to run after the delay, replacing any pending
    /// confirmation. While disarmed nothing is scheduled and `None` is
    /// returned.
    pub fn schedule<F>(&mut self, on_fire: F) -> Option<ConfirmationId>
    where
        F: FnOnce(ConfirmationId) + Send + 'static,
    {
        self.cancel();

        let runtime = self.runtime.as_ref()?;
        self.next_id += 1;
        let id = ConfirmationId(self.next_id);
        let deadline = Instant::now() + self.delay;

        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire(id);
        });

        self.pending = Some(PendingConfirmation {
            id,
            deadline,
            abort: task.abort_handle(),
        });
        Some(id)
    }

    /// Cancel the pending confirmation. Returns `true` if one existed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.cancel();
                true
            }
            None => false,
        }
    }

    /// Claim a firing. Returns `true` and clears the pending slot only when
    /// `id` is the confirmation currently pending; stale firings return
    /// `false` and leave the slot untouched.
    pub fn complete(&mut self, id: ConfirmationId) -> bool {
        if self.pending.as_ref().map(PendingConfirmation::id) == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(PendingConfirmation::remaining)
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for DebounceTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceTimer")
            .field("delay", &self.delay)
            .field("armed", &self.is_armed())
            .field("pending", &self.pending.as_ref().map(PendingConfirmation::id))
            .finish()
    }
}
