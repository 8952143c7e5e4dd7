//! Engine configuration.
//!
//! Holds the knobs the validator's common rules consult: which locale tags
//! are accepted and how large a step count may be.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by every call made through a
/// [`ScheduleManager`](crate::manager::ScheduleManager).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Locale tags a spec may carry. Matched case-insensitively.
    /// Defaults to `en-US`, `en-GB` and `es-ES`.
    #[cfg_attr(feature = "serde", serde(default = "default_locales"))]
    pub supported_locales: Vec<String>,

    /// Upper bound for every step count (days, weeks, months, range steps).
    /// Defaults to 1000.
    #[cfg_attr(feature = "serde", serde(default = "default_max_step"))]
    pub max_step: u32,
}

fn default_locales() -> Vec<String> {
    ["en-US", "en-GB", "es-ES"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_step() -> u32 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            supported_locales: default_locales(),
            max_step: default_max_step(),
        }
    }
}

impl EngineConfig {
    pub fn supports_locale(&self, tag: &str) -> bool {
        self.supported_locales
            .iter()
            .any(|l| l.eq_ignore_ascii_case(tag.trim()))
    }

    /// Load a configuration from JSON, filling missing keys with defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_step, 1000);
        assert!(config.supports_locale("en-US"));
        assert!(config.supports_locale("es-es"));
        assert!(!config.supports_locale("fr-FR"));
        assert!(!config.supports_locale(""));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "max_step": 50 }"#).unwrap();
        assert_eq!(config.max_step, 50);
        assert_eq!(config.supported_locales, default_locales());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_locales_override() {
        let config = EngineConfig::from_json(r#"{ "supported_locales": ["fr-FR"] }"#).unwrap();
        assert!(config.supports_locale("fr-fr"));
        assert!(!config.supports_locale("en-US"));
        assert_eq!(config.max_step, 1000);
    }
}
