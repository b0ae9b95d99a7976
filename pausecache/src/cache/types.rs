//! Core types for the object cache.

use crate::cache::record::Awaitable;
use crate::protocol::{ObjectId, PauseId, PreviewLevel, ProtocolError, RemoteObject};
use std::fmt;
use thiserror::Error;

/// Fidelity level of a cached object descriptor.
///
/// Ordered from weakest to strongest guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Some descriptor is known, no preview guarantee.
    Bare,
    /// Preview present but may be truncated (`canOverflow`).
    Partial,
    /// Preview guaranteed complete (`overflow == false`).
    Full,
}

impl Tier {
    /// Protocol level used to fetch this tier.
    ///
    /// `Bare` is never fetched on its own; it is a by-product of the others.
    pub fn preview_level(&self) -> Option<PreviewLevel> {
        match self {
            Tier::Bare => None,
            Tier::Partial => Some(PreviewLevel::CanOverflow),
            Tier::Full => Some(PreviewLevel::Full),
        }
    }

    /// Strongest tier a descriptor qualifies for.
    pub fn of(object: &RemoteObject) -> Self {
        match &object.preview {
            None => Tier::Bare,
            Some(preview) if preview.is_complete() => Tier::Full,
            Some(_) => Tier::Partial,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Bare => "bare",
            Tier::Partial => "partial",
            Tier::Full => "full",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bare" => Ok(Tier::Bare),
            "partial" | "canoverflow" => Ok(Tier::Partial),
            "full" => Ok(Tier::Full),
            _ => Err(format!("unknown tier '{}'", s)),
        }
    }
}

/// Composite key for a property of an object, unique within a pause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub object_id: ObjectId,
    pub name: String,
}

impl PropertyKey {
    /// Create a new property key.
    pub fn new(object_id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}]", self.object_id, self.name)
    }
}

/// Object cache errors.
///
/// `Clone` because a rejected record hands the same error to every reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectCacheError {
    /// The protocol client failed the fetch.
    #[error("Protocol fetch failed: {0}")]
    Protocol(#[from] ProtocolError),

    /// No cached descriptor exists for the object.
    #[error("Object {object_id} not found in pause {pause_id}")]
    NotFound { pause_id: PauseId, object_id: ObjectId },

    /// `Bare` cannot be requested from the protocol.
    #[error("Tier '{0}' cannot be fetched")]
    UnfetchableTier(Tier),

    /// A fetch could not be started because no async runtime is available.
    #[error("No async runtime available to fetch {0}")]
    NoRuntime(String),

    /// The record was dropped without ever being settled.
    #[error("Cache record was abandoned before it settled")]
    Abandoned,
}

/// Why a suspending read did not produce a value.
///
/// `NotReady` is not a failure: the caller should await the awaitable and
/// read again.
#[derive(Debug)]
pub enum Suspense<T> {
    /// Fetch in flight.
    NotReady(Awaitable<T>),
    /// The stored outcome for this key is a failure.
    Failed(ObjectCacheError),
}

impl<T> Suspense<T> {
    /// The stored error, if this is a failure.
    pub fn error(&self) -> Option<&ObjectCacheError> {
        match self {
            Suspense::Failed(e) => Some(e),
            Suspense::NotReady(_) => None,
        }
    }
}

impl<T> From<ObjectCacheError> for Suspense<T> {
    fn from(e: ObjectCacheError) -> Self {
        Suspense::Failed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ObjectPreview;
    use std::collections::HashSet;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Bare < Tier::Partial);
        assert!(Tier::Partial < Tier::Full);
    }

    #[test]
    fn test_tier_preview_levels() {
        assert_eq!(Tier::Bare.preview_level(), None);
        assert_eq!(Tier::Partial.preview_level(), Some(PreviewLevel::CanOverflow));
        assert_eq!(Tier::Full.preview_level(), Some(PreviewLevel::Full));
    }

    #[test]
    fn test_tier_of_object() {
        let bare = RemoteObject::bare("o1", "Object");
        assert_eq!(Tier::of(&bare), Tier::Bare);

        let partial = bare.clone().with_preview(ObjectPreview {
            overflow: Some(true),
            ..Default::default()
        });
        assert_eq!(Tier::of(&partial), Tier::Partial);

        let unspecified = bare.clone().with_preview(ObjectPreview::default());
        assert_eq!(Tier::of(&unspecified), Tier::Partial);

        let full = bare.with_preview(ObjectPreview::complete());
        assert_eq!(Tier::of(&full), Tier::Full);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("Full".parse::<Tier>(), Ok(Tier::Full));
        assert_eq!("canOverflow".parse::<Tier>(), Ok(Tier::Partial));
        assert!("medium".parse::<Tier>().is_err());
    }

    #[test]
    fn test_property_key_is_structural() {
        // A separator inside an id must not collide with another key.
        let a = PropertyKey::new("o1:x", "y");
        let b = PropertyKey::new("o1", "x:y");
        assert_ne!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_not_found_message() {
        let err = ObjectCacheError::NotFound {
            pause_id: "p1".into(),
            object_id: "o7".into(),
        };
        assert_eq!(err.to_string(), "Object o7 not found in pause p1");
    }

    #[test]
    fn test_protocol_error_converts() {
        let err: ObjectCacheError = ProtocolError::Transport("closed".into()).into();
        assert!(matches!(err, ObjectCacheError::Protocol(_)));
    }
}
