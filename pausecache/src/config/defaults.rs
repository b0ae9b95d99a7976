//! Default values for every setting.

use super::file::config_directory;
use super::settings::*;
use crate::cache::Tier;
use std::path::PathBuf;

/// Tier for reads that do not name one.
pub const DEFAULT_TIER: Tier = Tier::Partial;

/// Statistics are logged on shutdown unless disabled.
pub const DEFAULT_LOG_STATS: bool = true;

/// Recorded responses are served without delay by default.
pub const DEFAULT_FIXTURE_LATENCY_MS: u64 = 0;

/// Default log file: `~/.pausecache/pausecache.log`.
pub fn default_log_path() -> PathBuf {
    config_directory().join(crate::logging::default_log_file())
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            cache: CacheSettings {
                default_tier: DEFAULT_TIER,
                log_stats: DEFAULT_LOG_STATS,
            },
            fixture: FixtureSettings {
                latency_ms: DEFAULT_FIXTURE_LATENCY_MS,
            },
            logging: LoggingSettings {
                file: default_log_path(),
            },
        }
    }
}
