//! Logger that keeps messages in memory.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::{Arc, Mutex};

/// Collects formatted messages for later inspection.
///
/// Clones share the same buffer, so a test can hand one clone to the cache
/// and read messages back through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages logged so far, oldest first.
    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages at or above `level`.
    pub fn at_least(&self, level: LogLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l >= level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, args.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{log_error, log_info};

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        log_info!(logger, "first {}", 1);
        log_error!(logger, "second");

        assert_eq!(
            logger.messages(),
            vec![
                (LogLevel::Info, "first 1".to_string()),
                (LogLevel::Error, "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_clones_share_buffer() {
        let logger = MemoryLogger::new();
        let handle = logger.clone();
        logger.warn(format_args!("shared"));

        assert_eq!(handle.at_least(LogLevel::Warn), vec!["shared".to_string()]);
        assert!(handle.at_least(LogLevel::Error).is_empty());
    }
}
