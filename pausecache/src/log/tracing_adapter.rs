//! `tracing` backed logger.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Forwards every message to the matching `tracing` macro.
///
/// Output goes wherever the installed subscriber sends it; see
/// [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "pausecache", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "pausecache", "{}", args),
            LogLevel::Info => tracing::info!(target: "pausecache", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "pausecache", "{}", args),
            LogLevel::Error => tracing::error!(target: "pausecache", "{}", args),
        }
    }
}
