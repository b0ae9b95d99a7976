//! Tier-consistent ingestion of object descriptors.
//!
//! Every descriptor that reaches the cache, whether it was explicitly
//! requested or arrived as a side effect of an unrelated command, goes
//! through [`PauseScope::precache_one`]. This is the only place the
//! no-downgrade rule is enforced:
//!
//! ```text
//!   descriptor ──► objects            (insert if absent)
//!        │
//!        ├─ preview? ──► partial_previews  absent  → insert Resolved
//!        │                                 Pending → resolve in place
//!        │                                 settled → leave untouched
//!        │
//!        └─ overflow: Some(false)? ──► full_previews (same rule)
//! ```

use crate::cache::record::Record;
use crate::cache::scope::{PauseScope, PreviewRecord};
use crate::protocol::{ObjectId, RemoteObject};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// What one `precache_one` call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecacheOutcome {
    /// A bare descriptor was recorded for a previously unseen id.
    pub bare_inserted: bool,
    /// The partial tier gained a resolved value.
    pub partial_stored: bool,
    /// The full tier gained a resolved value.
    pub full_stored: bool,
}

impl PrecacheOutcome {
    /// Whether anything was written.
    pub fn changed(&self) -> bool {
        self.bare_inserted || self.partial_stored || self.full_stored
    }
}

impl PauseScope {
    /// Ingest a batch of descriptors.
    ///
    /// Returns how many of them changed the cache.
    pub fn precache_many<'a, I>(&self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a RemoteObject>,
    {
        objects
            .into_iter()
            .map(|object| self.precache_one(object))
            .filter(PrecacheOutcome::changed)
            .count()
    }

    /// Ingest a single descriptor into every tier it qualifies for.
    pub fn precache_one(&self, object: &RemoteObject) -> PrecacheOutcome {
        let mut outcome = PrecacheOutcome::default();

        if let Entry::Vacant(entry) = self.objects.entry(object.object_id.clone()) {
            entry.insert(object.clone());
            outcome.bare_inserted = true;
        }

        let Some(preview) = &object.preview else {
            return outcome;
        };

        outcome.partial_stored = store(&self.partial_previews, &object.object_id, object);

        if preview.is_complete() {
            outcome.full_stored = store(&self.full_previews, &object.object_id, object);
        }

        outcome
    }
}

/// Insert-or-settle without ever replacing a settled record.
fn store(map: &DashMap<ObjectId, PreviewRecord>, id: &ObjectId, object: &RemoteObject) -> bool {
    match map.entry(id.clone()) {
        Entry::Vacant(entry) => {
            entry.insert(Arc::new(Record::resolved(object.clone())));
            true
        }
        // Resolving a pending placeholder wakes any reader waiting on it.
        Entry::Occupied(entry) => entry.get().resolve(object.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::record::RecordState;
    use crate::cache::types::{ObjectCacheError, Tier};
    use crate::protocol::{ObjectPreview, ProtocolValue};
    use serde_json::json;

    fn preview(overflow: bool, props: &[(&str, i64)]) -> ObjectPreview {
        ObjectPreview {
            properties: props
                .iter()
                .map(|(name, v)| ProtocolValue::primitive(json!(v)).named(*name))
                .collect(),
            overflow: Some(overflow),
            ..Default::default()
        }
    }

    fn partial(id: &str) -> RemoteObject {
        RemoteObject::bare(id, "Array").with_preview(preview(true, &[("0", 1)]))
    }

    fn full(id: &str) -> RemoteObject {
        RemoteObject::bare(id, "Array").with_preview(preview(false, &[("0", 1), ("1", 2)]))
    }

    #[test]
    fn test_bare_object_only_fills_bare_tier() {
        let scope = PauseScope::new("p1".into());
        let outcome = scope.precache_one(&RemoteObject::bare("o1", "Object"));

        assert!(outcome.bare_inserted);
        assert!(!outcome.partial_stored);
        assert!(!outcome.full_stored);
        assert!(scope.bare_object(&"o1".into()).is_some());
        assert_eq!(scope.preview_count(Tier::Partial), 0);
        assert_eq!(scope.preview_count(Tier::Full), 0);
    }

    #[test]
    fn test_overflowing_preview_fills_partial_only() {
        let scope = PauseScope::new("p1".into());
        scope.precache_one(&partial("o1"));

        let record = scope.preview_record(Tier::Partial, &"o1".into()).unwrap();
        assert!(record.is_resolved());
        assert!(scope.preview_record(Tier::Full, &"o1".into()).is_none());
    }

    #[test]
    fn test_complete_preview_fills_both_tiers() {
        let scope = PauseScope::new("p1".into());
        let outcome = scope.precache_one(&full("o1"));

        assert!(outcome.partial_stored && outcome.full_stored);
        assert_eq!(
            scope.preview_record(Tier::Full, &"o1".into()).unwrap().value(),
            Some(full("o1"))
        );
    }

    #[test]
    fn test_bare_tier_is_first_write_wins() {
        let scope = PauseScope::new("p1".into());
        scope.precache_one(&RemoteObject::bare("o1", "Object"));
        let outcome = scope.precache_one(&full("o1"));

        assert!(!outcome.bare_inserted);
        assert_eq!(scope.bare_object(&"o1".into()).unwrap().class_name, "Object");
    }

    #[test]
    fn test_resolved_records_are_never_downgraded() {
        let scope = PauseScope::new("p1".into());
        scope.precache_one(&full("o1"));

        // Weaker data for the same id arrives later.
        let outcome = scope.precache_one(&partial("o1"));
        assert!(!outcome.changed());

        let partial_value = scope.preview_record(Tier::Partial, &"o1".into()).unwrap();
        assert_eq!(partial_value.value(), Some(full("o1")));

        let bare = scope.precache_one(&RemoteObject::bare("o1", "Array"));
        assert!(!bare.changed());
        assert_eq!(
            scope.preview_record(Tier::Full, &"o1".into()).unwrap().value(),
            Some(full("o1"))
        );
    }

    #[test]
    fn test_pending_placeholder_is_resolved_in_place() {
        let scope = PauseScope::new("p1".into());
        let (placeholder, inserted) = scope.claim_preview(Tier::Full, &"o1".into()).unwrap();
        assert!(inserted);

        scope.precache_one(&full("o1"));

        let stored = scope.preview_record(Tier::Full, &"o1".into()).unwrap();
        assert!(Arc::ptr_eq(&placeholder, &stored));
        assert_eq!(placeholder.value(), Some(full("o1")));
    }

    #[test]
    fn test_overflowing_preview_leaves_full_placeholder_pending() {
        let scope = PauseScope::new("p1".into());
        let (placeholder, _) = scope.claim_preview(Tier::Full, &"o1".into()).unwrap();

        scope.precache_one(&partial("o1"));

        assert!(placeholder.is_pending());
    }

    #[test]
    fn test_rejected_record_is_not_overwritten() {
        let scope = PauseScope::new("p1".into());
        let (placeholder, _) = scope.claim_preview(Tier::Partial, &"o1".into()).unwrap();
        placeholder.reject(ObjectCacheError::Abandoned);

        scope.precache_one(&partial("o1"));

        assert!(matches!(placeholder.state(), RecordState::Rejected(_)));
    }

    #[test]
    fn test_preview_without_overflow_field_stays_out_of_full_tier() {
        let scope = PauseScope::new("p1".into());
        let object: RemoteObject = serde_json::from_value(json!({
            "objectId": "o1",
            "className": "Array",
            "preview": { "properties": [] }
        }))
        .unwrap();

        assert_eq!(scope.precache_many([&object]), 1);

        assert!(scope.preview_record(Tier::Full, &"o1".into()).is_none());
        assert!(scope
            .preview_record(Tier::Partial, &"o1".into())
            .unwrap()
            .is_resolved());
    }

    #[test]
    fn test_precache_many_counts_changes() {
        let scope = PauseScope::new("p1".into());
        let batch = vec![full("o1"), partial("o2"), full("o1")];

        assert_eq!(scope.precache_many(&batch), 2);
        assert_eq!(scope.object_count(), 2);
    }
}
