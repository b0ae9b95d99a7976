//! Suspending and synchronous readers.
//!
//! Suspending readers are what a render pass calls: they either return the
//! value or report [`Suspense::NotReady`] with an awaitable to resume on. The
//! first reader of a key installs the pending record and starts the fetch;
//! later readers find that record and share its outcome.
//!
//! Synchronous readers only look at what is cached. They never start a fetch.

use crate::cache::object_cache::ObjectCache;
use crate::cache::record::{Record, RecordState};
use crate::cache::types::{ObjectCacheError, PropertyKey, Suspense, Tier};
use crate::protocol::{ObjectId, PauseId, ProtocolClient, ProtocolValue, RemoteObject};
use tokio::runtime::Handle;
use tracing::trace;

impl<C: ProtocolClient> ObjectCache<C> {
    /// Read an object's preview at `tier`, suspending on a miss.
    ///
    /// Safe to call repeatedly: a pending or settled record is re-checked,
    /// never re-fetched. `Tier::Bare` cannot be fetched and fails with
    /// [`ObjectCacheError::UnfetchableTier`].
    pub fn read_object(
        &self,
        pause_id: &PauseId,
        object_id: &ObjectId,
        tier: Tier,
    ) -> Result<RemoteObject, Suspense<RemoteObject>> {
        self.ctx.stats.record_read();

        if tier == Tier::Bare {
            return Err(ObjectCacheError::UnfetchableTier(tier).into());
        }
        let existing = self
            .registry
            .get(pause_id)
            .and_then(|scope| scope.preview_record(tier, object_id));
        if let Some(record) = existing {
            return self.observe(&record, false);
        }

        // Nothing is stored for a miss that cannot start its fetch.
        let handle = current_runtime(|| {
            format!("{} preview of {} in pause {}", tier, object_id, pause_id)
        })?;

        let scope = self.registry.scope(pause_id);
        let Some((record, inserted)) = scope.claim_preview(tier, object_id) else {
            return Err(ObjectCacheError::UnfetchableTier(tier).into());
        };

        if inserted {
            trace!(pause = %pause_id, object = %object_id, tier = %tier, "Object cache miss");
            self.start_preview_fetch(&handle, scope, object_id.clone(), tier, record.clone());
        }

        self.observe(&record, inserted)
    }

    /// Read a single property value, suspending on a miss.
    pub fn read_property(
        &self,
        pause_id: &PauseId,
        object_id: &ObjectId,
        name: &str,
    ) -> Result<ProtocolValue, Suspense<ProtocolValue>> {
        self.ctx.stats.record_read();

        let key = PropertyKey::new(object_id.clone(), name);
        let existing = self
            .registry
            .get(pause_id)
            .and_then(|scope| scope.property_record(&key));
        if let Some(record) = existing {
            return self.observe(&record, false);
        }

        let handle = current_runtime(|| format!("property {} in pause {}", key, pause_id))?;

        let scope = self.registry.scope(pause_id);
        let (record, inserted) = scope.claim_property(&key);

        if inserted {
            trace!(pause = %pause_id, property = %key, "Property cache miss");
            self.start_property_fetch(&handle, scope, key, record.clone());
        }

        self.observe(&record, inserted)
    }

    /// Best cached descriptor for an object: full, then partial, then bare.
    pub fn try_get_object(&self, pause_id: &PauseId, object_id: &ObjectId) -> Option<RemoteObject> {
        let scope = self.registry.get(pause_id)?;

        [Tier::Full, Tier::Partial]
            .into_iter()
            .find_map(|tier| scope.preview_record(tier, object_id)?.value())
            .or_else(|| scope.bare_object(object_id))
    }

    /// Cached property value, if it has resolved.
    pub fn try_get_property(&self, pause_id: &PauseId, key: &PropertyKey) -> Option<ProtocolValue> {
        self.registry.get(pause_id)?.property_record(key)?.value()
    }

    /// Like [`try_get_object`](Self::try_get_object), for callers that have
    /// already made sure the object was fetched.
    pub fn get_object_or_err(
        &self,
        pause_id: &PauseId,
        object_id: &ObjectId,
    ) -> Result<RemoteObject, ObjectCacheError> {
        self.try_get_object(pause_id, object_id)
            .ok_or_else(|| ObjectCacheError::NotFound {
                pause_id: pause_id.clone(),
                object_id: object_id.clone(),
            })
    }

    fn observe<T: Clone>(&self, record: &Record<T>, inserted: bool) -> Result<T, Suspense<T>> {
        match record.state() {
            RecordState::Resolved(value) => {
                self.ctx.stats.record_hit();
                Ok(value)
            }
            RecordState::Pending(awaitable) => {
                if !inserted {
                    self.ctx.stats.record_coalesced();
                }
                Err(Suspense::NotReady(awaitable))
            }
            RecordState::Rejected(e) => Err(e.into()),
        }
    }
}

/// Handle of the runtime a coordinator would be spawned on.
fn current_runtime(what: impl FnOnce() -> String) -> Result<Handle, ObjectCacheError> {
    Handle::try_current().map_err(|_| ObjectCacheError::NoRuntime(what()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        ObjectPreview, ObjectsResponse, PreviewLevel, PropertyResponse, ProtocolError,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Client that answers immediately and counts calls.
    #[derive(Default)]
    struct StaticClient {
        preview_calls: AtomicUsize,
        property_calls: AtomicUsize,
        fail: bool,
    }

    impl ProtocolClient for StaticClient {
        async fn get_object_with_preview(
            &self,
            object_id: &ObjectId,
            _pause_id: &PauseId,
            level: PreviewLevel,
        ) -> Result<ObjectsResponse, ProtocolError> {
            self.preview_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProtocolError::Transport("offline".into()));
            }
            let preview = ObjectPreview {
                overflow: Some(level == PreviewLevel::CanOverflow),
                ..Default::default()
            };
            Ok(ObjectsResponse {
                objects: vec![RemoteObject::bare(object_id.clone(), "Object").with_preview(preview)],
            })
        }

        async fn get_object_property(
            &self,
            _object_id: &ObjectId,
            _pause_id: &PauseId,
            name: &str,
        ) -> Result<PropertyResponse, ProtocolError> {
            self.property_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProtocolError::Transport("offline".into()));
            }
            Ok(PropertyResponse {
                objects: vec![],
                returned: ProtocolValue::primitive(json!(name.len())),
            })
        }
    }

    fn cache(fail: bool) -> (ObjectCache<StaticClient>, Arc<StaticClient>) {
        let client = Arc::new(StaticClient {
            fail,
            ..Default::default()
        });
        (ObjectCache::new(Arc::clone(&client)), client)
    }

    #[tokio::test]
    async fn test_miss_suspends_then_resolves() {
        let (cache, client) = cache(false);
        let (pause, id) = (PauseId::new("p1"), ObjectId::new("o1"));

        let awaitable = match cache.read_object(&pause, &id, Tier::Full) {
            Err(Suspense::NotReady(a)) => a,
            other => panic!("expected NotReady, got {:?}", other),
        };
        let object = awaitable.await.unwrap();
        assert_eq!(object.object_id, id);

        let again = cache.read_object(&pause, &id, Tier::Full).unwrap();
        assert_eq!(again, object);
        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bare_tier_is_unfetchable() {
        let (cache, client) = cache(false);

        let err = cache
            .read_object(&"p1".into(), &"o1".into(), Tier::Bare)
            .unwrap_err();

        assert_eq!(err.error(), Some(&ObjectCacheError::UnfetchableTier(Tier::Bare)));
        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejection_is_resignalled() {
        let (cache, client) = cache(true);
        let (pause, id) = (PauseId::new("p1"), ObjectId::new("o1"));

        if let Err(Suspense::NotReady(a)) = cache.read_object(&pause, &id, Tier::Partial) {
            assert!(a.await.is_err());
        }

        for _ in 0..3 {
            let err = cache.read_object(&pause, &id, Tier::Partial).unwrap_err();
            assert_eq!(
                err.error(),
                Some(&ObjectCacheError::Protocol(ProtocolError::Transport(
                    "offline".into()
                )))
            );
        }
        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_property_read() {
        let (cache, client) = cache(false);
        let (pause, id) = (PauseId::new("p1"), ObjectId::new("o1"));

        if let Err(Suspense::NotReady(a)) = cache.read_property(&pause, &id, "length") {
            a.await.unwrap();
        }

        let value = cache.read_property(&pause, &id, "length").unwrap();
        assert_eq!(value.value, Some(json!(6)));
        assert_eq!(
            cache.try_get_property(&pause, &PropertyKey::new("o1", "length")),
            Some(value)
        );
        assert_eq!(client.property_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sync_readers_never_fetch() {
        let (cache, client) = cache(false);
        let (pause, id) = (PauseId::new("p1"), ObjectId::new("o1"));

        assert!(cache.try_get_object(&pause, &id).is_none());
        assert!(cache
            .try_get_property(&pause, &PropertyKey::new("o1", "x"))
            .is_none());
        assert!(matches!(
            cache.get_object_or_err(&pause, &id),
            Err(ObjectCacheError::NotFound { .. })
        ));
        assert_eq!(cache.pause_count(), 0);
        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_try_get_object_prefers_stronger_tiers() {
        let (cache, _) = cache(false);
        let pause = PauseId::new("p1");

        let bare = RemoteObject::bare("o1", "Object");
        cache.precache_many(&pause, &[bare.clone()]);
        assert_eq!(cache.try_get_object(&pause, &"o1".into()), Some(bare.clone()));

        let partial = bare.clone().with_preview(ObjectPreview {
            overflow: Some(true),
            ..Default::default()
        });
        cache.precache_many(&pause, &[partial.clone()]);
        assert_eq!(cache.try_get_object(&pause, &"o1".into()), Some(partial));

        let full = bare.with_preview(ObjectPreview::complete());
        cache.precache_many(&pause, &[full.clone()]);
        assert_eq!(cache.try_get_object(&pause, &"o1".into()), Some(full.clone()));
        assert_eq!(cache.get_object_or_err(&pause, &"o1".into()), Ok(full));
    }

    #[test]
    fn test_miss_without_runtime_stores_nothing() {
        let (cache, client) = cache(false);
        let (pause, id) = (PauseId::new("p1"), ObjectId::new("o1"));

        let err = cache.read_object(&pause, &id, Tier::Full).unwrap_err();
        assert!(matches!(err.error(), Some(ObjectCacheError::NoRuntime(_))));
        let err = cache.read_property(&pause, &id, "length").unwrap_err();
        assert!(matches!(err.error(), Some(ObjectCacheError::NoRuntime(_))));
        assert_eq!(cache.pause_count(), 0);

        // The same keys fetch normally once a runtime is available.
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let object = runtime
            .block_on(cache.read_object_async(&pause, &id, Tier::Full))
            .unwrap();
        assert_eq!(object.object_id, id);
        let value = runtime
            .block_on(cache.read_property_async(&pause, &id, "length"))
            .unwrap();
        assert_eq!(value.value, Some(json!(6)));

        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.property_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cached_reads_need_no_runtime() {
        let (cache, client) = cache(false);
        let pause = PauseId::new("p1");
        let full = RemoteObject::bare("o1", "Object").with_preview(ObjectPreview::complete());
        cache.precache_many(&pause, &[full.clone()]);

        assert_eq!(cache.read_object(&pause, &"o1".into(), Tier::Full).unwrap(), full);
        assert_eq!(client.preview_calls.load(Ordering::SeqCst), 0);
    }
}
