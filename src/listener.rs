//! State-change listeners.
//!
//! Listeners are identified by their `Arc` allocation: subscribing the same
//! `Arc` twice keeps a single registration, and unsubscribing needs a clone of
//! that same `Arc`.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::machine::ReadinessState;

/// Receives every committed state change.
///
/// Implemented for any `Fn(ReadinessState) + Send + Sync` closure.
///
/// # Example
///
/// ```rust
/// use readiness::{ReadinessState, StateListener};
/// use std::sync::Arc;
///
/// struct Panel;
///
/// impl StateListener for Panel {
///     fn on_state_changed(&self, state: ReadinessState) {
///         println!("show panel for {state}");
///     }
/// }
///
/// let panel: Arc<dyn StateListener> = Arc::new(Panel);
/// let logger: Arc<dyn StateListener> = Arc::new(|state: ReadinessState| {
///     println!("readiness -> {state}");
/// });
/// # let _ = (panel, logger);
/// ```
pub trait StateListener: Send + Sync {
    fn on_state_changed(&self, state: ReadinessState);
}

impl<F> StateListener for F
where
    F: Fn(ReadinessState) + Send + Sync,
{
    fn on_state_changed(&self, state: ReadinessState) {
        self(state)
    }
}

fn same_listener(a: &Arc<dyn StateListener>, b: &Arc<dyn StateListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Ordered set of listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn StateListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` unless it is already registered.
    /// Returns `true` if the registry changed.
    pub fn subscribe(&self, listener: Arc<dyn StateListener>) -> bool {
        let mut listeners = self.listeners.write();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove `listener`. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, listener: &Arc<dyn StateListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    /// Deliver `state` to every listener in subscription order.
    ///
    /// The list is snapshotted first, so listeners may subscribe or
    /// unsubscribe from inside the callback; changes apply to the next
    /// notification.
    pub fn notify(&self, state: ReadinessState) {
        let snapshot: Vec<_> = self.listeners.read().clone();
        for listener in snapshot {
            listener.on_state_changed(state);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<(&'static str, ReadinessState)>>>;

    fn tagged(log: &Log, tag: &'static str) -> Arc<dyn StateListener> {
        let log = Arc::clone(log);
        Arc::new(move |state: ReadinessState| log.lock().push((tag, state)))
    }

    #[test]
    fn notifies_in_subscription_order() {
        let log: Log = Arc::default();
        let registry = ListenerRegistry::new();
        registry.subscribe(tagged(&log, "panel"));
        registry.subscribe(tagged(&log, "flow"));

        registry.notify(ReadinessState::Idle);

        assert_eq!(
            *log.lock(),
            vec![("panel", ReadinessState::Idle), ("flow", ReadinessState::Idle)]
        );
    }

    #[test]
    fn duplicate_subscribe_is_ignored() {
        let log: Log = Arc::default();
        let registry = ListenerRegistry::new();
        let panel = tagged(&log, "panel");

        assert!(registry.subscribe(Arc::clone(&panel)));
        assert!(!registry.subscribe(Arc::clone(&panel)));
        assert_eq!(registry.len(), 1);

        registry.notify(ReadinessState::BadAngle);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let log: Log = Arc::default();
        let registry = ListenerRegistry::new();
        let panel = tagged(&log, "panel");
        let flow = tagged(&log, "flow");
        registry.subscribe(Arc::clone(&panel));
        registry.subscribe(Arc::clone(&flow));

        assert!(registry.unsubscribe(&panel));
        registry.notify(ReadinessState::NoFace);

        assert_eq!(*log.lock(), vec![("flow", ReadinessState::NoFace)]);
    }

    #[test]
    fn unsubscribe_of_stranger_is_a_no_op() {
        let log: Log = Arc::default();
        let registry = ListenerRegistry::new();
        registry.subscribe(tagged(&log, "panel"));

        // Same behaviour, different allocation
        assert!(!registry.unsubscribe(&tagged(&log, "panel")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_notify() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(Mutex::new(0));

        let slot: Arc<Mutex<Option<Arc<dyn StateListener>>>> = Arc::default();
        let listener: Arc<dyn StateListener> = {
            let registry = Arc::clone(&registry);
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            Arc::new(move |_state: ReadinessState| {
                *calls.lock() += 1;
                if let Some(me) = slot.lock().take() {
                    registry.unsubscribe(&me);
                }
            })
        };
        *slot.lock() = Some(Arc::clone(&listener));
        registry.subscribe(listener);

        registry.notify(ReadinessState::AllGo);
        registry.notify(ReadinessState::Test);

        assert_eq!(*calls.lock(), 1);
        assert!(registry.is_empty());
    }
}
