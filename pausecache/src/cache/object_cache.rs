//! The object cache facade.
//!
//! [`ObjectCache`] ties the pause registry, the protocol client and the fetch
//! coordinators together. Reads live in [`super::reader`] and the async
//! helpers in [`super::adapters`]; this file holds construction, bulk
//! ingestion and lifecycle.

use crate::cache::fetch::{self, FetchContext};
use crate::cache::record::Record;
use crate::cache::scope::{PauseRegistry, PauseScope};
use crate::cache::stats::{CacheStats, StatsCounters};
use crate::cache::types::{PropertyKey, Tier};
use crate::log::{Logger, TracingLogger};
use crate::log_info;
use crate::protocol::{ObjectId, PauseId, ProtocolClient, ProtocolValue, RemoteObject};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Pause-scoped, tiered cache of protocol object descriptors.
///
/// Cloning is cheap and every clone shares the same maps.
///
/// # Example
///
/// ```ignore
/// use pausecache::cache::{ObjectCache, Tier};
/// use pausecache::protocol::FixtureClient;
/// use std::sync::Arc;
///
/// let client = Arc::new(FixtureClient::load(path)?);
/// let cache = ObjectCache::new(client);
///
/// let object = cache
///     .read_object_async(&"p1".into(), &"o1".into(), Tier::Full)
///     .await?;
/// ```
pub struct ObjectCache<C> {
    pub(super) registry: Arc<PauseRegistry>,
    pub(super) ctx: FetchContext<C>,
}

impl<C> Clone for ObjectCache<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            ctx: self.ctx.clone(),
        }
    }
}

impl<C: ProtocolClient> ObjectCache<C> {
    /// Create a cache that fetches through `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            registry: Arc::new(PauseRegistry::new()),
            ctx: FetchContext {
                client,
                stats: Arc::new(StatsCounters::default()),
                logger: Arc::new(TracingLogger),
            },
        }
    }

    /// Replace the logger used for lifecycle and consistency messages.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.ctx.logger = logger;
        self
    }

    /// The protocol client this cache fetches through.
    pub fn client(&self) -> &Arc<C> {
        &self.ctx.client
    }

    /// Bulk ingestion entry point.
    ///
    /// For callers that received descriptors as a side effect of an unrelated
    /// command and want them cached without a dedicated fetch.
    pub fn precache_many(&self, pause_id: &PauseId, objects: &[RemoteObject]) -> usize {
        let changed = self.registry.scope(pause_id).precache_many(objects);
        self.ctx.stats.record_precached(changed);
        changed
    }

    /// Forget everything cached for `pause_id`.
    ///
    /// Returns false if nothing was cached for it.
    pub fn evict(&self, pause_id: &PauseId) -> bool {
        let evicted = self.registry.evict(pause_id);
        if evicted {
            log_info!(self.ctx.logger, "Evicted object cache for pause {}", pause_id);
        }
        evicted
    }

    /// Number of pauses currently holding cache state.
    pub fn pause_count(&self) -> usize {
        self.registry.len()
    }

    /// The scope for `pause_id`, if one exists.
    pub fn scope(&self, pause_id: &PauseId) -> Option<Arc<PauseScope>> {
        self.registry.get(pause_id)
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.ctx.stats.snapshot()
    }

    /// Log current statistics at info level.
    pub fn log_stats(&self) {
        self.ctx.stats.log(self.registry.len());
    }

    pub(super) fn start_preview_fetch(
        &self,
        runtime: &Handle,
        scope: Arc<PauseScope>,
        object_id: ObjectId,
        tier: Tier,
        record: Arc<Record<RemoteObject>>,
    ) {
        runtime.spawn(fetch::fetch_with_preview(
            self.ctx.clone(),
            scope,
            object_id,
            tier,
            record,
        ));
    }

    pub(super) fn start_property_fetch(
        &self,
        runtime: &Handle,
        scope: Arc<PauseScope>,
        key: PropertyKey,
        record: Arc<Record<ProtocolValue>>,
    ) {
        runtime.spawn(fetch::fetch_property(self.ctx.clone(), scope, key, record));
    }
}
