//! Settings structs, one per `[section]` of the INI file.

use crate::cache::Tier;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub fixture: FixtureSettings,
    pub logging: LoggingSettings,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Tier used for reads that do not name one
    pub default_tier: Tier,
    /// Log cache statistics when the cache owner shuts down
    pub log_stats: bool,
}

/// `[fixture]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSettings {
    /// Artificial delay added to every recorded response, in milliseconds
    pub latency_ms: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
