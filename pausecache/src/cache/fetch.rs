//! Fetch coordinators.
//!
//! A coordinator owns the single in-flight protocol request for one cache
//! key. It is started by the reader that installed the pending record, runs
//! to settlement, and never retries.
//!
//! ```text
//! reader A ─┐ (installs placeholder)
//!           ├──► coordinator ──► ProtocolClient
//! reader B ─┘        │                 │
//!   (awaits)         ▼                 ▼
//!             precache every returned object into the scope
//!                    │
//!                    ▼
//!             placeholder settled in place ──► A and B resume
//! ```

use crate::cache::scope::{PauseScope, PreviewRecord, PropertyRecord};
use crate::cache::stats::StatsCounters;
use crate::cache::types::{ObjectCacheError, PropertyKey, Tier};
use crate::log::Logger;
use crate::log_error;
use crate::protocol::{ObjectId, ProtocolClient, RemoteObject};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared dependencies handed to every coordinator.
pub(crate) struct FetchContext<C> {
    pub(crate) client: Arc<C>,
    pub(crate) stats: Arc<StatsCounters>,
    pub(crate) logger: Arc<dyn Logger>,
}

impl<C> Clone for FetchContext<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            stats: Arc::clone(&self.stats),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<C: ProtocolClient> FetchContext<C> {
    fn ingest(&self, scope: &PauseScope, objects: &[RemoteObject]) {
        let changed = scope.precache_many(objects);
        self.stats.record_precached(changed);
    }
}

/// Fetch a preview for `(scope, object_id, tier)` and settle `record`.
///
/// `record` is the placeholder the reader installed. After precaching the
/// response it normally holds the requested object already; if it is still
/// pending the backend broke its contract and the record is rejected with
/// `NotFound`.
pub(crate) async fn fetch_with_preview<C: ProtocolClient>(
    ctx: FetchContext<C>,
    scope: Arc<PauseScope>,
    object_id: ObjectId,
    tier: Tier,
    record: PreviewRecord,
) {
    let Some(level) = tier.preview_level() else {
        record.reject(ObjectCacheError::UnfetchableTier(tier));
        return;
    };

    ctx.stats.record_fetch();
    debug!(pause = %scope.pause_id(), object = %object_id, level = %level, "Fetching object preview");

    let response = ctx
        .client
        .get_object_with_preview(&object_id, scope.pause_id(), level)
        .await;

    match response {
        Ok(response) => {
            ctx.ingest(&scope, &response.objects);

            if record.is_pending() {
                log_error!(
                    ctx.logger,
                    "Preview response for {} (pause {}, level {}) did not contain a matching descriptor ({} objects returned)",
                    object_id,
                    scope.pause_id(),
                    level,
                    response.objects.len()
                );
                record.reject(ObjectCacheError::NotFound {
                    pause_id: scope.pause_id().clone(),
                    object_id,
                });
            }
        }
        Err(e) => {
            ctx.stats.record_failure();
            warn!(pause = %scope.pause_id(), object = %object_id, error = %e, "Object preview fetch failed");
            record.reject(e.into());
        }
    }
}

/// Fetch one property value and settle `record` with it.
pub(crate) async fn fetch_property<C: ProtocolClient>(
    ctx: FetchContext<C>,
    scope: Arc<PauseScope>,
    key: PropertyKey,
    record: PropertyRecord,
) {
    ctx.stats.record_fetch();
    debug!(pause = %scope.pause_id(), property = %key, "Fetching object property");

    let response = ctx
        .client
        .get_object_property(&key.object_id, scope.pause_id(), &key.name)
        .await;

    match response {
        Ok(response) => {
            ctx.ingest(&scope, &response.objects);
            record.resolve(response.returned);
        }
        Err(e) => {
            ctx.stats.record_failure();
            warn!(pause = %scope.pause_id(), property = %key, error = %e, "Object property fetch failed");
            record.reject(e.into());
        }
    }
}
