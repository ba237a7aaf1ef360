//! Classification of raw collaborator inputs.
//!
//! Sensor fusion and face detection happen elsewhere; this module only turns
//! their results into the two-valued signals the machine acts on.

use serde::{Deserialize, Serialize};

use crate::config::ReadinessConfig;

/// Device orientation relative to upright, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub pitch_deg: f32,
    pub roll_deg: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleClass {
    Good,
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacePresence {
    Present,
    Absent,
}

impl OrientationSample {
    pub fn new(pitch_deg: f32, roll_deg: f32) -> Self {
        Self {
            pitch_deg,
            roll_deg,
        }
    }

    /// Both angles must be strictly inside their tolerance. Non-finite
    /// readings never count as upright.
    pub fn classify(&self, config: &ReadinessConfig) -> AngleClass {
        let pitch_ok = self.pitch_deg.abs() < config.pitch_tolerance_deg;
        let roll_ok = self.roll_deg.abs() < config.roll_tolerance_deg;

        if pitch_ok && roll_ok {
            AngleClass::Good
        } else {
            AngleClass::Bad
        }
    }
}

impl FacePresence {
    /// Presence from the number of faces found in one detection cycle.
    pub fn from_count(count: usize) -> Self {
        if count > 0 {
            FacePresence::Present
        } else {
            FacePresence::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_device_is_good() {
        let config = ReadinessConfig::default();
        assert_eq!(
            OrientationSample::new(0.0, 0.0).classify(&config),
            AngleClass::Good
        );
        assert_eq!(
            OrientationSample::new(-9.5, 9.5).classify(&config),
            AngleClass::Good
        );
    }

    #[test]
    fn tolerance_boundary_is_exclusive() {
        let config = ReadinessConfig::default();
        assert_eq!(
            OrientationSample::new(10.0, 0.0).classify(&config),
            AngleClass::Bad
        );
        assert_eq!(
            OrientationSample::new(0.0, -10.0).classify(&config),
            AngleClass::Bad
        );
    }

    #[test]
    fn either_axis_out_of_tolerance_is_bad() {
        let config = ReadinessConfig {
            pitch_tolerance_deg: 5.0,
            roll_tolerance_deg: 20.0,
            ..ReadinessConfig::default()
        };
        assert_eq!(
            OrientationSample::new(6.0, 0.0).classify(&config),
            AngleClass::Bad
        );
        assert_eq!(
            OrientationSample::new(0.0, 15.0).classify(&config),
            AngleClass::Good
        );
    }

    #[test]
    fn nan_reading_is_bad() {
        let config = ReadinessConfig::default();
        assert_eq!(
            OrientationSample::new(f32::NAN, 0.0).classify(&config),
            AngleClass::Bad
        );
        assert_eq!(
            OrientationSample::new(0.0, f32::INFINITY).classify(&config),
            AngleClass::Bad
        );
    }

    #[test]
    fn face_presence_from_count() {
        assert_eq!(FacePresence::from_count(0), FacePresence::Absent);
        assert_eq!(FacePresence::from_count(1), FacePresence::Present);
        assert_eq!(FacePresence::from_count(3), FacePresence::Present);
    }
}
