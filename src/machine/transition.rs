//! Event-driven transition table.

use crate::core::{Guard, State};
use crate::machine::state::{ReadinessEvent, ReadinessState};

/// A guarded move to `to` whenever `event` arrives.
pub struct Transition<S: State, E> {
    pub event: E,
    pub to: S,
    pub guard: Guard<S>,
}

impl<S: State, E> Transition<S, E> {
    /// Check if this transition can execute from the current state (pure)
    pub fn can_execute(&self, current: &S) -> bool {
        self.guard.check(current)
    }
}

impl<S: State, E: Clone> Clone for Transition<S, E> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
        }
    }
}

/// Maps (current state, event) to the next state.
///
/// Lookup is total: an event with no rule, or whose guard rejects the current
/// state, resolves to `None` and the caller leaves the state alone. When
/// several rules share an event the first one whose guard passes wins.
pub struct TransitionTable<S: State, E> {
    transitions: Vec<Transition<S, E>>,
}

impl<S: State, E: PartialEq> TransitionTable<S, E> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Add a rule.
    pub fn on(mut self, event: E, to: S, guard: Guard<S>) -> Self {
        self.transitions.push(Transition { event, to, guard });
        self
    }

    /// Next state for `event` from `current`, or `None` if the event is ignored.
    pub fn resolve(&self, current: &S, event: &E) -> Option<S> {
        self.transitions
            .iter()
            .filter(|t| t.event == *event)
            .find(|t| t.can_execute(current))
            .map(|t| t.to.clone())
    }

    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.transitions
    }
}

impl<S: State, E: PartialEq> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionTable<ReadinessState, ReadinessEvent> {
    /// The readiness check's transition rules.
    pub fn readiness() -> Self {
        use crate::machine::state::ReadinessEvent as Ev;
        use crate::machine::state::ReadinessState::*;

        TransitionTable::new()
            .on(
                Ev::ReportBadAngle,
                BadAngle,
                Guard::any_of(&[Idle, NoFace, ConfirmedAngle, AllGo, WaitingAngle]),
            )
            .on(Ev::ReportGoodAngle, WaitingAngle, Guard::any_of(&[BadAngle]))
            .on(Ev::ConfirmAngle, ConfirmedAngle, Guard::any_of(&[WaitingAngle]))
            .on(Ev::AdvanceFromButton, NoFace, Guard::any_of(&[ConfirmedAngle]))
            .on(Ev::FaceDetected, AllGo, Guard::any_of(&[NoFace]))
            .on(Ev::FaceLost, NoFace, Guard::any_of(&[AllGo]))
            .on(Ev::BeginTest, Test, Guard::any_of(&[AllGo]))
            .on(Ev::ReportError, Error, Guard::always())
            // A running test is never interrupted by a permission re-check
            .on(Ev::ReportNoPermission, NoPermission, Guard::none_of(&[Test]))
            .on(
                Ev::ReportPermissionGranted,
                Idle,
                Guard::any_of(&[NoPermission, Error]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::state::ReadinessEvent as Ev;
    use crate::machine::state::ReadinessState::*;

    fn allowed_from(
        table: &TransitionTable<ReadinessState, ReadinessEvent>,
        event: Ev,
    ) -> Vec<ReadinessState> {
        ReadinessState::variants()
            .iter()
            .copied()
            .filter(|s| table.resolve(s, &event).is_some())
            .collect()
    }

    #[test]
    fn bad_angle_allowed_from_progress_states() {
        let table = TransitionTable::readiness();
        assert_eq!(
            allowed_from(&table, Ev::ReportBadAngle),
            vec![Idle, WaitingAngle, ConfirmedAngle, NoFace, AllGo]
        );
        assert_eq!(table.resolve(&AllGo, &Ev::ReportBadAngle), Some(BadAngle));
    }

    #[test]
    fn single_source_events() {
        let table = TransitionTable::readiness();
        let cases = [
            (Ev::ReportGoodAngle, BadAngle, WaitingAngle),
            (Ev::ConfirmAngle, WaitingAngle, ConfirmedAngle),
            (Ev::AdvanceFromButton, ConfirmedAngle, NoFace),
            (Ev::FaceDetected, NoFace, AllGo),
            (Ev::FaceLost, AllGo, NoFace),
            (Ev::BeginTest, AllGo, Test),
        ];

        for (event, from, to) in cases {
            assert_eq!(allowed_from(&table, event), vec![from], "{event}");
            assert_eq!(table.resolve(&from, &event), Some(to), "{event}");
        }
    }

    #[test]
    fn error_is_reachable_from_everywhere() {
        let table = TransitionTable::readiness();
        assert_eq!(
            allowed_from(&table, Ev::ReportError),
            ReadinessState::variants().to_vec()
        );
        assert!(ReadinessState::variants()
            .iter()
            .all(|s| table.resolve(s, &Ev::ReportError) == Some(Error)));
    }

    #[test]
    fn no_permission_ignored_during_test() {
        let table = TransitionTable::readiness();
        assert_eq!(table.resolve(&Test, &Ev::ReportNoPermission), None);
        assert_eq!(
            table.resolve(&AllGo, &Ev::ReportNoPermission),
            Some(NoPermission)
        );
        assert_eq!(allowed_from(&table, Ev::ReportNoPermission).len(), 8);
    }

    #[test]
    fn permission_grant_recovers_from_error_states() {
        let table = TransitionTable::readiness();
        assert_eq!(
            allowed_from(&table, Ev::ReportPermissionGranted),
            vec![NoPermission, Error]
        );
    }

    #[test]
    fn empty_table_ignores_everything() {
        let table: TransitionTable<ReadinessState, ReadinessEvent> = TransitionTable::default();
        assert!(table.transitions().is_empty());
        assert_eq!(table.resolve(&Idle, &Ev::ReportError), None);
    }

    #[test]
    fn first_passing_rule_wins() {
        let table = TransitionTable::new()
            .on(Ev::ReportError, Idle, Guard::any_of(&[Test]))
            .on(Ev::ReportError, Error, Guard::always());

        assert_eq!(table.resolve(&Test, &Ev::ReportError), Some(Idle));
        assert_eq!(table.resolve(&AllGo, &Ev::ReportError), Some(Error));
    }
}
