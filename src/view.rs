//! Mapping from readiness state to the panel shown to the user.

use serde::{Deserialize, Serialize};

use crate::machine::ReadinessState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelView {
    Testing,
    NoFace,
    NoPermission,
    AllGo,
    GoodAngle,
    WaitingUpright,
    NotUpright,
    Error,
}

impl PanelView {
    /// Panel dedicated to `state`, if it has one. `Idle` has none.
    pub fn mapped(state: ReadinessState) -> Option<PanelView> {
        match state {
            ReadinessState::Test => Some(PanelView::Testing),
            ReadinessState::NoFace => Some(PanelView::NoFace),
            ReadinessState::NoPermission => Some(PanelView::NoPermission),
            ReadinessState::AllGo => Some(PanelView::AllGo),
            ReadinessState::ConfirmedAngle => Some(PanelView::GoodAngle),
            ReadinessState::WaitingAngle => Some(PanelView::WaitingUpright),
            ReadinessState::BadAngle => Some(PanelView::NotUpright),
            ReadinessState::Error => Some(PanelView::Error),
            ReadinessState::Idle => None,
        }
    }

    /// Panel to display for `state`; states without a panel show the error panel.
    pub fn for_state(state: ReadinessState) -> PanelView {
        Self::mapped(state).unwrap_or(PanelView::Error)
    }

    /// Whether this panel shows the hold-still countdown.
    pub fn shows_countdown(&self) -> bool {
        matches!(self, PanelView::WaitingUpright)
    }
}

impl From<ReadinessState> for PanelView {
    fn from(state: ReadinessState) -> Self {
        PanelView::for_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_mapped_state_has_its_own_panel() {
        let panels: HashSet<_> = ReadinessState::variants()
            .iter()
            .filter_map(|s| PanelView::mapped(*s))
            .collect();
        assert_eq!(panels.len(), ReadinessState::variants().len() - 1);
    }

    #[test]
    fn idle_falls_back_to_error_panel() {
        assert_eq!(PanelView::mapped(ReadinessState::Idle), None);
        assert_eq!(PanelView::for_state(ReadinessState::Idle), PanelView::Error);
    }

    #[test]
    fn angle_states_map_to_angle_panels() {
        assert_eq!(
            PanelView::from(ReadinessState::BadAngle),
            PanelView::NotUpright
        );
        assert_eq!(
            PanelView::from(ReadinessState::WaitingAngle),
            PanelView::WaitingUpright
        );
        assert_eq!(
            PanelView::from(ReadinessState::ConfirmedAngle),
            PanelView::GoodAngle
        );
        assert!(PanelView::WaitingUpright.shows_countdown());
        assert!(!PanelView::GoodAngle.shows_countdown());
    }
}
