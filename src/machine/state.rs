//! States and events of the readiness check.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state_enum;

state_enum! {
    /// Where the user currently is in the readiness check.
    ///
    /// `Test` is final for this controller. `NoPermission` and `Error` are the
    /// two error states; both leave only through a granted permission check.
    #[derive(Copy, Eq, Hash)]
    pub enum ReadinessState {
        NoPermission,
        Error,
        Idle,
        BadAngle,
        WaitingAngle,
        ConfirmedAngle,
        NoFace,
        AllGo,
        Test,
    }
    final: [Test]
    error: [NoPermission, Error]
}

impl Default for ReadinessState {
    fn default() -> Self {
        ReadinessState::NoPermission
    }
}

/// Named inputs the machine reacts to.
///
/// `ConfirmAngle` is raised only by the debounce timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessEvent {
    ReportBadAngle,
    ReportGoodAngle,
    ConfirmAngle,
    AdvanceFromButton,
    FaceDetected,
    FaceLost,
    BeginTest,
    ReportError,
    ReportNoPermission,
    ReportPermissionGranted,
}

impl ReadinessEvent {
    pub const ALL: [ReadinessEvent; 10] = [
        ReadinessEvent::ReportBadAngle,
        ReadinessEvent::ReportGoodAngle,
        ReadinessEvent::ConfirmAngle,
        ReadinessEvent::AdvanceFromButton,
        ReadinessEvent::FaceDetected,
        ReadinessEvent::FaceLost,
        ReadinessEvent::BeginTest,
        ReadinessEvent::ReportError,
        ReadinessEvent::ReportNoPermission,
        ReadinessEvent::ReportPermissionGranted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReportBadAngle => "report_bad_angle",
            Self::ReportGoodAngle => "report_good_angle",
            Self::ConfirmAngle => "confirm_angle",
            Self::AdvanceFromButton => "advance_from_button",
            Self::FaceDetected => "face_detected",
            Self::FaceLost => "face_lost",
            Self::BeginTest => "begin_test",
            Self::ReportError => "report_error",
            Self::ReportNoPermission => "report_no_permission",
            Self::ReportPermissionGranted => "report_permission_granted",
        }
    }

    /// Whether hosts may raise this event directly.
    pub fn is_external(&self) -> bool {
        !matches!(self, Self::ConfirmAngle)
    }
}

impl fmt::Display for ReadinessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
