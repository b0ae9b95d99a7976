//! PauseCache - protocol object cache for debugger frontends
//!
//! While a debuggee is paused, the frontend inspects remote values through
//! descriptors fetched from a backend. This library caches those descriptors
//! per pause, at three levels of preview fidelity, and makes sure concurrent
//! readers share one request per key.
//!
//! # High-Level API
//!
//! [`cache::ObjectCache`] is the entry point:
//!
//! ```ignore
//! use pausecache::cache::{ObjectCache, Suspense, Tier};
//! use pausecache::protocol::FixtureClient;
//! use std::sync::Arc;
//!
//! let cache = ObjectCache::new(Arc::new(FixtureClient::load(path)?));
//!
//! // Render-pass style: either a value now, or something to wait on.
//! match cache.read_object(&pause_id, &object_id, Tier::Partial) {
//!     Ok(object) => render(object),
//!     Err(Suspense::NotReady(awaitable)) => schedule_retry(awaitable),
//!     Err(Suspense::Failed(e)) => show_error(e),
//! }
//!
//! // Async style: waits for the shared fetch.
//! let object = cache.read_object_async(&pause_id, &object_id, Tier::Full).await?;
//! ```

pub mod cache;
pub mod config;
pub mod log;
pub mod logging;
pub mod protocol;

/// Version of the PauseCache library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
