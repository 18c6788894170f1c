//! Checker configuration

use serde::{Deserialize, Serialize};
use ttcn3_diagnostics::{Result, Ttcn3Error};

/// Switches that hold for a whole checker instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Check literals against subtype restrictions when a call asks for it
    pub check_subtypes: bool,
    /// Warn about character patterns, which are accepted without validation
    pub warn_unvalidated_patterns: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            check_subtypes: true,
            warn_unvalidated_patterns: false,
        }
    }
}

impl CheckerConfig {
    /// Load the configuration from a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Ttcn3Error::configuration(e.to_string()))
    }

    /// Load the configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Ttcn3Error::configuration(e.to_string()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ttcn3_diagnostics::TTCN0501;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CheckerConfig::from_json(r#"{ "warn_unvalidated_patterns": true }"#).unwrap();
        assert_eq!(
            config,
            CheckerConfig {
                check_subtypes: true,
                warn_unvalidated_patterns: true,
            }
        );
    }

    #[test]
    fn test_unknown_key_is_a_configuration_error() {
        let err = CheckerConfig::from_json(r#"{ "check_everything": true }"#).unwrap_err();
        assert_eq!(err.code(), TTCN0501);
    }
}
