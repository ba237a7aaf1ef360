//! Core State trait for state machine states.
//!
//! States are plain values. The trait only exposes pure inspection methods
//! used by guards, logging and the view layer.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone` + `PartialEq`: states are compared by guards and copied into history
/// - `Debug`: states show up in diagnostics
/// - `Serialize` + `Deserialize`: history snapshots can be dumped as JSON
///
/// # Example
///
/// ```rust
/// use readiness::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
///     Broken,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
///
/// assert!(Lamp::Broken.is_error());
/// assert!(!Lamp::On.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether no further progress is expected from this state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether this state reports a failure condition.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Door {
        Closed,
        Open,
        Jammed,
    }

    impl State for Door {
        fn name(&self) -> &str {
            match self {
                Self::Closed => "Closed",
                Self::Open => "Open",
                Self::Jammed => "Jammed",
            }
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Jammed)
        }
    }

    #[test]
    fn default_methods_report_non_final() {
        assert!(!Door::Closed.is_final());
        assert!(!Door::Jammed.is_final());
    }

    #[test]
    fn overridden_error_flag_is_used() {
        assert!(Door::Jammed.is_error());
        assert!(!Door::Open.is_error());
    }

    #[test]
    fn state_serializes_by_variant_name() {
        let json = serde_json::to_string(&Door::Open).unwrap();
        assert_eq!(json, "\"Open\"");
        assert_eq!(Door::Open.name(), "Open");
    }
}
