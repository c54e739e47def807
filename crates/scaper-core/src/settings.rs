//! Bridge settings

use std::path::Path;

use scaper_data::NullConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings shared by every widget instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Strings read as missing values during coercion
    pub null_config: NullConfig,

    /// Whether mounted scenes are visible to tooling through the live
    /// registry. Containers are claimed either way.
    pub publish: bool,

    /// Whether a specification's message queue is replayed
    pub replay_queue: bool,

    /// Whether incoming specifications are logged at debug level
    pub log_spec: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            null_config: NullConfig::default(),
            publish: true,
            replay_queue: true,
            log_spec: true,
        }
    }
}

impl BridgeSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = BridgeSettings::from_json_str(r#"{ "publish": false }"#).unwrap();
        assert!(!settings.publish);
        assert!(settings.replay_queue);
        assert_eq!(settings.null_config, NullConfig::default());
    }

    #[test]
    fn test_null_patterns_override() {
        let settings =
            BridgeSettings::from_json_str(r#"{ "null_config": { "patterns": ["."] } }"#).unwrap();
        assert!(settings.null_config.is_null("."));
        assert!(!settings.null_config.is_null("NA"));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            BridgeSettings::from_json_str("{ nope"),
            Err(SettingsError::Parse(_))
        ));
    }
}
