//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use pausecache::cache::{CacheStats, Tier};
use pausecache::config::ConfigFile;
use serde::Serialize;

use crate::error::CliError;

/// Preview fidelity selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum TierArg {
    /// Preview may be truncated (canOverflow)
    Partial,
    /// Preview guaranteed complete
    Full,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Partial => Tier::Partial,
            TierArg::Full => Tier::Full,
        }
    }
}

/// Resolve the tier: CLI > config.
pub fn resolve_tier(arg: Option<TierArg>, config: &ConfigFile) -> Tier {
    arg.map(Tier::from).unwrap_or(config.cache.default_tier)
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a short statistics summary.
pub fn print_stats(stats: &CacheStats, protocol_calls: u64) {
    println!();
    println!("Cache statistics:");
    println!("  Reads:           {}", stats.reads);
    println!("  Hits:            {}", stats.hits);
    println!("  Coalesced:       {}", stats.coalesced);
    println!("  Protocol calls:  {}", protocol_calls);
    println!("  Failures:        {}", stats.fetch_failures);
    println!("  Precached:       {}", stats.objects_precached);
}
