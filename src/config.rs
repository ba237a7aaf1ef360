//! Tunable constants for the readiness machine.
//!
//! Hosts usually take [`ReadinessConfig::default`]. A JSON document can
//! override any subset of fields; missing fields keep their defaults.
//! Validation runs every rule and reports all violations together instead
//! of stopping at the first one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

use crate::error::{ReadinessError, Result};

/// Longest debounce a host may configure.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Largest pitch or roll tolerance, in degrees.
pub const MAX_TOLERANCE_DEG: f32 = 90.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// How long the device must stay upright before the angle is confirmed
    pub debounce_ms: u64,

    /// Maximum absolute pitch, in degrees, still counted as upright
    pub pitch_tolerance_deg: f32,

    /// Maximum absolute roll, in degrees, still counted as upright
    pub roll_tolerance_deg: f32,

    /// Number of committed transitions kept for diagnostics
    pub history_capacity: usize,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1500,
            pitch_tolerance_deg: 10.0,
            roll_tolerance_deg: 10.0,
            history_capacity: 64,
        }
    }
}

/// A single violated configuration rule.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("debounce_ms must be between 1 and {} (got {debounce_ms})", MAX_DEBOUNCE_MS)]
    DebounceOutOfRange { debounce_ms: u64 },

    #[error("{axis} tolerance must be a finite angle in (0, {}] degrees (got {value})", MAX_TOLERANCE_DEG)]
    ToleranceOutOfRange { axis: &'static str, value: f32 },

    #[error("history_capacity must be at least 1")]
    HistoryCapacityZero,
}

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::Success(())
    } else {
        Validation::Failure(NonEmptyVec::new(violation(), Vec::new()))
    }
}

fn tolerance_in_range(value: f32) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_TOLERANCE_DEG
}

impl ReadinessConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Run every rule, accumulating all violations.
    pub fn check_all(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            check((1..=MAX_DEBOUNCE_MS).contains(&self.debounce_ms), || {
                ConfigViolation::DebounceOutOfRange {
                    debounce_ms: self.debounce_ms,
                }
            }),
            check(tolerance_in_range(self.pitch_tolerance_deg), || {
                ConfigViolation::ToleranceOutOfRange {
                    axis: "pitch",
                    value: self.pitch_tolerance_deg,
                }
            }),
            check(tolerance_in_range(self.roll_tolerance_deg), || {
                ConfigViolation::ToleranceOutOfRange {
                    axis: "roll",
                    value: self.roll_tolerance_deg,
                }
            }),
            check(self.history_capacity >= 1, || {
                ConfigViolation::HistoryCapacityZero
            }),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate, converting accumulated violations into a [`ReadinessError`].
    pub fn validate(&self) -> Result<()> {
        match self.check_all() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => Err(ReadinessError::InvalidConfig(
                violations.iter().cloned().collect(),
            )),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
