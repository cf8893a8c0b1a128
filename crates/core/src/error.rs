//! Error types for the cellsim core.

use thiserror::Error;

/// Errors produced by grid construction, the rule registry, the engine and metrics.
#[derive(Debug, Error)]
pub enum AutomataError {
    /// Invalid dimensionality, non-positive grid size, unsupported initialization
    /// mode or unsupported neighborhood pattern.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A rule name was registered twice.
    #[error("rule '{0}' is already registered")]
    DuplicateRule(String),

    /// Lookup of a rule name that was never registered.
    #[error("unknown rule '{name}' (registered: {})", known.join(", "))]
    UnknownRule { name: String, known: Vec<String> },

    /// A rule returned a grid that is not congruent with its input.
    #[error("rule '{rule}' violated its contract: expected {expected}, got {found}")]
    RuleContractViolation {
        rule: String,
        expected: String,
        found: String,
    },

    /// A rule was handed a grid of the wrong cell family or dimensionality.
    #[error("rule '{rule}' cannot operate on this grid: {reason}")]
    IncompatibleGrid { rule: String, reason: String },

    /// A metric is undefined for the given input.
    #[error("metric unavailable: {0}")]
    UnsupportedMetric(String),

    /// Reading or writing an archive or report failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// An archive or report could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for AutomataError {
    fn from(e: std::io::Error) -> Self {
        AutomataError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AutomataError {
    fn from(e: serde_json::Error) -> Self {
        AutomataError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_includes_message() {
        let err = AutomataError::Configuration("dimensionality must be 1 or 2, got 3".into());
        let msg = format!("{err}");
        assert!(msg.contains("dimensionality"), "missing detail in: {msg}");
        assert!(msg.contains('3'), "missing value in: {msg}");
    }

    #[test]
    fn duplicate_rule_includes_name() {
        let err = AutomataError::DuplicateRule("rule_110".into());
        let msg = format!("{err}");
        assert!(msg.contains("rule_110"), "missing name in: {msg}");
    }

    #[test]
    fn unknown_rule_lists_known_names() {
        let err = AutomataError::UnknownRule {
            name: "rule_999".into(),
            known: vec!["game_of_life".into(), "rule_30".into()],
        };
        let msg = format!("{err}");
        assert!(msg.contains("rule_999"), "missing name in: {msg}");
        assert!(msg.contains("game_of_life, rule_30"), "missing known names in: {msg}");
    }

    #[test]
    fn contract_violation_includes_all_fields() {
        let err = AutomataError::RuleContractViolation {
            rule: "broken".into(),
            expected: "plane 4x4".into(),
            found: "plane 3x4".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("broken"), "missing rule in: {msg}");
        assert!(msg.contains("plane 4x4"), "missing expected in: {msg}");
        assert!(msg.contains("plane 3x4"), "missing found in: {msg}");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = AutomataError::from(io);
        assert!(matches!(err, AutomataError::Io(ref m) if m.contains("no such file")));
    }

    #[test]
    fn serde_json_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        assert!(matches!(
            AutomataError::from(bad),
            AutomataError::Serialization(_)
        ));
    }

    #[test]
    fn automata_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AutomataError>();
    }

    #[test]
    fn automata_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<AutomataError>();
    }
}
