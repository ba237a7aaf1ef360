//! Error types for the readiness crate.
//!
//! Rejected events are never errors; they are reported as
//! [`TransitionOutcome::Ignored`](crate::machine::TransitionOutcome::Ignored).
//! The errors here cover configuration and runtime wiring only.

use thiserror::Error;

use crate::config::ConfigViolation;

/// Result type alias using the readiness error type.
pub type Result<T> = std::result::Result<T, ReadinessError>;

#[derive(Debug, Error)]
pub enum ReadinessError {
    /// One or more configuration rules were violated; all of them are listed.
    #[error("Invalid configuration: {}", format_violations(.0))]
    InvalidConfig(Vec<ConfigViolation>),

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The debounce timer needs a tokio runtime to schedule confirmations
    #[error("No tokio runtime available to arm the debounce timer")]
    RuntimeUnavailable(#[source] tokio::runtime::TryCurrentError),
}

fn format_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_every_violation() {
        let err = ReadinessError::InvalidConfig(vec![
            ConfigViolation::DebounceOutOfRange { debounce_ms: 0 },
            ConfigViolation::HistoryCapacityZero,
        ]);

        let message = err.to_string();
        assert!(message.contains("debounce"));
        assert!(message.contains("history"));
        assert!(message.contains("; "));
    }

    #[test]
    fn parse_errors_convert_from_serde_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReadinessError = parse.into();
        assert!(matches!(err, ReadinessError::ConfigParse(_)));
    }
}
