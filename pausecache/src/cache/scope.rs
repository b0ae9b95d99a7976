//! Pause-scoped cache partitions.
//!
//! Object ids are only unique within a pause, so every cache map lives inside
//! a [`PauseScope`] and scopes are looked up by [`PauseId`] in the
//! [`PauseRegistry`]. Scopes are created lazily on first access and only go
//! away through an explicit [`PauseRegistry::evict`].

use crate::cache::record::Record;
use crate::cache::types::{PropertyKey, Tier};
use crate::protocol::{ObjectId, PauseId, ProtocolValue, RemoteObject};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to an object preview record.
pub type PreviewRecord = Arc<Record<RemoteObject>>;

/// Shared handle to a property value record.
pub type PropertyRecord = Arc<Record<ProtocolValue>>;

/// The four cache maps belonging to one pause.
#[derive(Debug)]
pub struct PauseScope {
    pause_id: PauseId,
    /// Bare tier: first descriptor seen for each id, never replaced.
    pub(super) objects: DashMap<ObjectId, RemoteObject>,
    pub(super) properties: DashMap<PropertyKey, PropertyRecord>,
    pub(super) partial_previews: DashMap<ObjectId, PreviewRecord>,
    pub(super) full_previews: DashMap<ObjectId, PreviewRecord>,
}

impl PauseScope {
    /// Create an empty scope.
    pub fn new(pause_id: PauseId) -> Self {
        Self {
            pause_id,
            objects: DashMap::new(),
            properties: DashMap::new(),
            partial_previews: DashMap::new(),
            full_previews: DashMap::new(),
        }
    }

    pub fn pause_id(&self) -> &PauseId {
        &self.pause_id
    }

    /// Preview map backing `tier`. `Bare` has no record map.
    pub(super) fn preview_map(&self, tier: Tier) -> Option<&DashMap<ObjectId, PreviewRecord>> {
        match tier {
            Tier::Bare => None,
            Tier::Partial => Some(&self.partial_previews),
            Tier::Full => Some(&self.full_previews),
        }
    }

    /// Existing preview record for `(tier, id)`.
    pub fn preview_record(&self, tier: Tier, object_id: &ObjectId) -> Option<PreviewRecord> {
        self.preview_map(tier)?
            .get(object_id)
            .map(|r| Arc::clone(r.value()))
    }

    /// Existing property record.
    pub fn property_record(&self, key: &PropertyKey) -> Option<PropertyRecord> {
        self.properties.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Return the preview record for `(tier, id)`, installing a pending one on
    /// a miss.
    ///
    /// The check and insert are atomic: among concurrent callers exactly one
    /// sees `inserted == true` and is responsible for starting the fetch.
    pub(super) fn claim_preview(
        &self,
        tier: Tier,
        object_id: &ObjectId,
    ) -> Option<(PreviewRecord, bool)> {
        let map = self.preview_map(tier)?;
        Some(claim(map, object_id.clone()))
    }

    /// Property counterpart of [`claim_preview`](Self::claim_preview).
    pub(super) fn claim_property(&self, key: &PropertyKey) -> (PropertyRecord, bool) {
        claim(&self.properties, key.clone())
    }

    /// Bare descriptor for `id`, if any has been seen.
    pub fn bare_object(&self, object_id: &ObjectId) -> Option<RemoteObject> {
        self.objects.get(object_id).map(|o| o.value().clone())
    }

    /// Number of distinct object ids seen in this pause.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of property records, settled or not.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Number of preview records for `tier`, settled or not.
    pub fn preview_count(&self, tier: Tier) -> usize {
        self.preview_map(tier).map_or(0, |m| m.len())
    }
}

fn claim<K, T>(map: &DashMap<K, Arc<Record<T>>>, key: K) -> (Arc<Record<T>>, bool)
where
    K: std::hash::Hash + Eq,
    T: Clone,
{
    match map.entry(key) {
        Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
        Entry::Vacant(entry) => {
            let record = Arc::new(Record::pending());
            entry.insert(Arc::clone(&record));
            (record, true)
        }
    }
}

/// Owns one [`PauseScope`] per pause.
#[derive(Debug, Default)]
pub struct PauseRegistry {
    scopes: DashMap<PauseId, Arc<PauseScope>>,
}

impl PauseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the scope for `pause_id`, creating an empty one if needed.
    pub fn scope(&self, pause_id: &PauseId) -> Arc<PauseScope> {
        if let Some(scope) = self.scopes.get(pause_id) {
            return Arc::clone(scope.value());
        }

        let scope = self
            .scopes
            .entry(pause_id.clone())
            .or_insert_with(|| {
                debug!(pause = %pause_id, "Creating pause scope");
                Arc::new(PauseScope::new(pause_id.clone()))
            });
        Arc::clone(scope.value())
    }

    /// Return the scope for `pause_id` without creating it.
    pub fn get(&self, pause_id: &PauseId) -> Option<Arc<PauseScope>> {
        self.scopes.get(pause_id).map(|s| Arc::clone(s.value()))
    }

    /// Drop the registry's handle to a scope.
    ///
    /// Fetches already running against the scope still settle their records;
    /// the next access to `pause_id` starts from an empty scope.
    pub fn evict(&self, pause_id: &PauseId) -> bool {
        self.scopes.remove(pause_id).is_some()
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_created_lazily_and_reused() {
        let registry = PauseRegistry::new();
        let pause = PauseId::new("p1");

        assert!(registry.get(&pause).is_none());
        assert!(registry.is_empty());

        let first = registry.scope(&pause);
        let second = registry.scope(&pause);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert_eq!(first.pause_id(), &pause);
    }

    #[test]
    fn test_scopes_are_isolated_per_pause() {
        let registry = PauseRegistry::new();
        let p1 = registry.scope(&"p1".into());
        let p2 = registry.scope(&"p2".into());

        p1.objects
            .insert("o1".into(), RemoteObject::bare("o1", "Object"));

        assert!(p1.bare_object(&"o1".into()).is_some());
        assert!(p2.bare_object(&"o1".into()).is_none());
    }

    #[test]
    fn test_claim_preview_inserts_once() {
        let scope = PauseScope::new("p1".into());
        let id = ObjectId::new("o1");

        let (first, inserted) = scope.claim_preview(Tier::Full, &id).unwrap();
        assert!(inserted);
        assert!(first.is_pending());

        let (second, inserted) = scope.claim_preview(Tier::Full, &id).unwrap();
        assert!(!inserted);
        assert!(Arc::ptr_eq(&first, &second));

        // Tiers are separate maps.
        let (_, inserted) = scope.claim_preview(Tier::Partial, &id).unwrap();
        assert!(inserted);
        assert_eq!(scope.preview_count(Tier::Full), 1);
        assert_eq!(scope.preview_count(Tier::Partial), 1);
    }

    #[test]
    fn test_bare_tier_has_no_record_map() {
        let scope = PauseScope::new("p1".into());
        assert!(scope.claim_preview(Tier::Bare, &"o1".into()).is_none());
        assert!(scope.preview_record(Tier::Bare, &"o1".into()).is_none());
        assert_eq!(scope.preview_count(Tier::Bare), 0);
    }

    #[test]
    fn test_claim_property() {
        let scope = PauseScope::new("p1".into());
        let key = PropertyKey::new("o1", "length");

        let (record, inserted) = scope.claim_property(&key);
        assert!(inserted);
        let (again, inserted) = scope.claim_property(&key);
        assert!(!inserted);
        assert!(Arc::ptr_eq(&record, &again));
        assert_eq!(scope.property_count(), 1);
        assert!(scope.property_record(&key).is_some());
    }

    #[test]
    fn test_evict_drops_scope() {
        let registry = PauseRegistry::new();
        let pause = PauseId::new("p1");
        let old = registry.scope(&pause);

        assert!(registry.evict(&pause));
        assert!(!registry.evict(&pause));
        assert!(registry.get(&pause).is_none());

        let fresh = registry.scope(&pause);
        assert!(!Arc::ptr_eq(&old, &fresh));
    }
}
