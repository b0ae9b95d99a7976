//! User configuration.
//!
//! Settings live in `~/.pausecache/config.ini`. A missing file means
//! defaults; a present file overlays whatever keys it sets.
//!
//! ```
//! use pausecache::config::ConfigFile;
//! use pausecache::cache::Tier;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.cache.default_tier, Tier::Partial);
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_path, DEFAULT_FIXTURE_LATENCY_MS, DEFAULT_LOG_STATS, DEFAULT_TIER,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{CacheSettings, ConfigFile, FixtureSettings, LoggingSettings};
