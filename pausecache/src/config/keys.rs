//! Configuration key access and validation.
//!
//! Type-safe get/set of individual settings by `section.key` name, used by
//! the `config` CLI commands.

use super::parser::{expand_tilde, parse_bool, parse_default_tier};
use super::settings::ConfigFile;
use std::str::FromStr;
use thiserror::Error;

/// Errors getting or setting a configuration value.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CacheDefaultTier,
    CacheLogStats,
    FixtureLatencyMs,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Full key name, e.g. `cache.default_tier`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::CacheDefaultTier => "cache.default_tier",
            ConfigKey::CacheLogStats => "cache.log_stats",
            ConfigKey::FixtureLatencyMs => "fixture.latency_ms",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Current value as displayed to users.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::CacheDefaultTier => config.cache.default_tier.to_string(),
            ConfigKey::CacheLogStats => config.cache.log_stats.to_string(),
            ConfigKey::FixtureLatencyMs => config.fixture.latency_ms.to_string(),
            ConfigKey::LoggingFile => config.logging.file.to_string_lossy().to_string(),
        }
    }

    /// Validate `value` and store it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let fail = |reason: &str| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::CacheDefaultTier => {
                config.cache.default_tier =
                    parse_default_tier(value).ok_or_else(|| fail("must be 'partial' or 'full'"))?;
            }
            ConfigKey::CacheLogStats => {
                config.cache.log_stats =
                    parse_bool(value).ok_or_else(|| fail("must be 'true' or 'false'"))?;
            }
            ConfigKey::FixtureLatencyMs => {
                config.fixture.latency_ms = value
                    .trim()
                    .parse()
                    .map_err(|_| fail("must be a non-negative integer (milliseconds)"))?;
            }
            ConfigKey::LoggingFile => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(fail("must not be empty"));
                }
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CacheDefaultTier,
            ConfigKey::CacheLogStats,
            ConfigKey::FixtureLatencyMs,
            ConfigKey::LoggingFile,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Tier;

    #[test]
    fn test_parse_key_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "CACHE.LOG_STATS".parse::<ConfigKey>().unwrap(),
            ConfigKey::CacheLogStats
        );
        assert!(matches!(
            "cache.nope".parse::<ConfigKey>(),
            Err(ConfigKeyError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_then_get() {
        let mut config = ConfigFile::default();

        ConfigKey::CacheDefaultTier.set(&mut config, "full").unwrap();
        ConfigKey::FixtureLatencyMs.set(&mut config, "15").unwrap();

        assert_eq!(config.cache.default_tier, Tier::Full);
        assert_eq!(ConfigKey::CacheDefaultTier.get(&config), "full");
        assert_eq!(ConfigKey::FixtureLatencyMs.get(&config), "15");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::CacheDefaultTier.set(&mut config, "bare").is_err());
        assert!(ConfigKey::CacheLogStats.set(&mut config, "sometimes").is_err());
        assert!(ConfigKey::FixtureLatencyMs.set(&mut config, "-1").is_err());
        assert!(ConfigKey::LoggingFile.set(&mut config, "  ").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_section() {
        assert_eq!(ConfigKey::LoggingFile.section(), "logging");
    }
}
