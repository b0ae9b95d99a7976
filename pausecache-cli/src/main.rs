//! PauseCache CLI - Command-line interface
//!
//! Drives the object cache over a recorded debugging session, so caching,
//! coalescing and tier behavior can be inspected without a live backend.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::common::TierArg;
use commands::config::ConfigCommands;
use commands::object::ObjectArgs;
use commands::precache::PrecacheArgs;
use commands::property::PropertyArgs;

#[derive(Parser)]
#[command(name = "pausecache")]
#[command(version = pausecache::VERSION)]
#[command(about = "Inspect remote objects of a recorded session through the pause cache", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read an object preview
    Object {
        /// Path to the JSON recording
        recording: PathBuf,

        /// Pause id
        #[arg(long)]
        pause: String,

        /// Object id
        #[arg(long)]
        object: String,

        /// Preview tier (defaults to cache.default_tier from config.ini)
        #[arg(long, value_enum)]
        tier: Option<TierArg>,

        /// Number of concurrent readers for the same object
        #[arg(long, default_value = "1")]
        readers: usize,
    },

    /// Read a single property value
    Property {
        /// Path to the JSON recording
        recording: PathBuf,

        /// Pause id
        #[arg(long)]
        pause: String,

        /// Object id
        #[arg(long)]
        object: String,

        /// Property name
        #[arg(long)]
        name: String,

        /// Number of concurrent readers for the same property
        #[arg(long, default_value = "1")]
        readers: usize,
    },

    /// Bulk-ingest recorded objects and show what each tier holds
    Precache {
        /// Path to the JSON recording
        recording: PathBuf,

        /// Only this pause (default: every pause in the recording)
        #[arg(long)]
        pause: Option<String>,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    let result = match cli.command {
        Commands::Object {
            recording,
            pause,
            object,
            tier,
            readers,
        } => commands::object::run(ObjectArgs {
            recording,
            pause,
            object,
            tier,
            readers,
            debug,
        }),
        Commands::Property {
            recording,
            pause,
            object,
            name,
            readers,
        } => commands::property::run(PropertyArgs {
            recording,
            pause,
            object,
            name,
            readers,
            debug,
        }),
        Commands::Precache { recording, pause } => commands::precache::run(PrecacheArgs {
            recording,
            pause,
            debug,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
