//! Typed settings derived from the key/value [`Configuration`](super::Configuration).

use serde::{Deserialize, Serialize};

use super::{Configuration, JSON_LOGGING, LOG_LEVEL};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    /// Read logging settings, falling back to defaults for missing keys
    pub fn from_configuration(config: &Configuration) -> Self {
        let defaults = Self::default();
        Self {
            log_level: config
                .get_string(LOG_LEVEL)
                .filter(|level| !level.is_empty())
                .unwrap_or(defaults.log_level),
            json_logging: config.get_bool(JSON_LOGGING).unwrap_or(defaults.json_logging),
        }
    }

    /// Raise the level to `debug` for `--verbose`
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_configuration() {
        let config = Configuration::from_overrides([
            (LOG_LEVEL, "warn".to_string()),
            (JSON_LOGGING, "true".to_string()),
        ])
        .unwrap();

        let observability = ObservabilityConfig::from_configuration(&config);
        assert_eq!(observability.log_level, "warn");
        assert!(observability.json_logging);
        assert_eq!(observability.verbose().log_level, "debug");
    }
}
