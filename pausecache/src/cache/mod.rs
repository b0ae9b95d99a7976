//! Pause-scoped, tiered cache for protocol object descriptors.
//!
//! Object ids are unique only within a pause, previews come at different
//! fidelities, and many call sites race for the same data. The cache keeps
//! one [`PauseScope`] per pause, tracks three tiers per object (bare,
//! partial, full), coalesces concurrent requests onto a single fetch, and
//! opportunistically caches every descriptor a response carries.

mod adapters;
mod fetch;
mod object_cache;
mod precache;
mod reader;
mod record;
mod scope;
mod stats;
mod types;

pub use adapters::settle;
pub use object_cache::ObjectCache;
pub use precache::PrecacheOutcome;
pub use record::{Awaitable, Record, RecordState};
pub use scope::{PauseRegistry, PauseScope, PreviewRecord, PropertyRecord};
pub use stats::CacheStats;
pub use types::{ObjectCacheError, PropertyKey, Suspense, Tier};
