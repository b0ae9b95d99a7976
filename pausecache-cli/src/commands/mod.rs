//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`object`] - Read an object preview through the cache
//! - [`precache`] - Bulk-ingest every recorded object of a pause
//! - [`property`] - Read a single property through the cache

pub mod common;
pub mod config;
pub mod object;
pub mod precache;
pub mod property;
