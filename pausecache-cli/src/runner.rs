//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, config loading, runtime and cache
//! creation to reduce duplication across command handlers.

use crate::error::CliError;
use pausecache::cache::ObjectCache;
use pausecache::config::ConfigFile;
use pausecache::log::TracingLogger;
use pausecache::logging::{default_log_file, init_logging, LoggingGuard};
use pausecache::protocol::FixtureClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    ///
    /// Stdout logging is only enabled when stdout is not a TTY, so
    /// interactive output stays readable.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("PauseCache v{}", pausecache::VERSION);
        info!("PauseCache CLI: {} command", command);
    }

    /// Build the multi-threaded runtime the cache's fetches run on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }

    /// Load a recording and wrap it in an object cache.
    ///
    /// The configured fixture latency is applied to every response.
    pub fn create_cache(
        &self,
        recording: &Path,
    ) -> Result<(ObjectCache<FixtureClient>, Arc<FixtureClient>), CliError> {
        let client = FixtureClient::load(recording).map_err(|error| CliError::Recording {
            path: recording.display().to_string(),
            error,
        })?;

        let latency = Duration::from_millis(self.config.fixture.latency_ms);
        let client = Arc::new(client.with_latency(latency));

        info!(
            recording = %recording.display(),
            pauses = client.pause_ids().len(),
            latency_ms = self.config.fixture.latency_ms,
            "Recording loaded"
        );

        let cache = ObjectCache::new(Arc::clone(&client)).with_logger(Arc::new(TracingLogger));
        Ok((cache, client))
    }

    /// Report cache statistics on the way out, if enabled.
    pub fn finish(&self, cache: &ObjectCache<FixtureClient>) {
        if self.config.cache.log_stats {
            cache.log_stats();
        }
    }
}
