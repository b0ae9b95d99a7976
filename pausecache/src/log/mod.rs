//! Injectable logging for cache components.
//!
//! Hot-path diagnostics go straight through `tracing`. Messages a host may
//! want to route or assert on (scope eviction, backend consistency errors)
//! go through the [`Logger`] trait so the owner of an
//! [`ObjectCache`](crate::cache::ObjectCache) decides where they end up:
//!
//! - [`TracingLogger`]: forwards to `tracing` (the default)
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: keeps messages in memory for inspection
//!
//! ```
//! use pausecache::log::{Logger, MemoryLogger};
//! use pausecache::log_warn;
//!
//! let logger = MemoryLogger::new();
//! log_warn!(logger, "pause {} evicted", "p1");
//! assert_eq!(logger.messages().len(), 1);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
