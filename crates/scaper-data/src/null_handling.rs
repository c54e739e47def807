//! Null value handling for incoming columns

use serde::{Deserialize, Serialize};

/// Null value configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),
                "NA".to_string(),
                "N/A".to_string(),
                "NaN".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Config that only treats JSON `null` as missing
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            ..Self::default()
        }
    }

    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Remove a null pattern
    pub fn remove_pattern(&mut self, pattern: &str) {
        self.patterns.retain(|p| p != pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  NA "));
        assert!(config.is_null("nan"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_sensitive() {
        let config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        assert!(config.is_null("NA"));
        assert!(!config.is_null("na"));
    }

    #[test]
    fn test_pattern_editing() {
        let mut config = NullConfig::none();
        assert!(!config.is_null(""));

        config.add_pattern("-".to_string());
        config.add_pattern("-".to_string());
        assert_eq!(config.patterns.len(), 1);
        assert!(config.is_null("-"));

        config.remove_pattern("-");
        assert!(!config.is_null("-"));
    }
}
