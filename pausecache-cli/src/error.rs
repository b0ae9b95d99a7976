//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use pausecache::cache::ObjectCacheError;
use pausecache::config::ConfigFileError;
use pausecache::protocol::FixtureError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to load the recording
    Recording { path: String, error: FixtureError },
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// A cache read failed
    Read(ObjectCacheError),
    /// Failed to render output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Recording { .. } => {
                eprintln!();
                eprintln!("A recording is a JSON file of the form:");
                eprintln!("  {{ \"pauses\": {{ \"<pause>\": {{ \"objects\": [...], \"properties\": {{...}} }} }} }}");
            }
            CliError::Read(ObjectCacheError::Protocol(_)) => {
                eprintln!();
                eprintln!("Use 'pausecache precache <recording>' to list the recorded pauses and objects.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Recording { path, error } => {
                write!(f, "Failed to load recording '{}': {}", path, error)
            }
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Read(e) => write!(f, "Read failed: {}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Recording { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            CliError::Read(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ObjectCacheError> for CliError {
    fn from(e: ObjectCacheError) -> Self {
        CliError::Read(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
