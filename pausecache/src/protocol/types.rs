//! Protocol descriptor types.
//!
//! These mirror the JSON shapes the debugging protocol returns for objects,
//! previews and property values. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one execution-point snapshot.
///
/// Every object identifier is scoped to a pause: the same `ObjectId` may name
/// unrelated values in two different pauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PauseId(String);

impl PauseId {
    /// Create a pause id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PauseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifies a remote value. Unique only within a [`PauseId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create an object id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Preview fidelity requested from the protocol.
///
/// `Full` guarantees `overflow == false` for the requested object,
/// `CanOverflow` lets the server truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreviewLevel {
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "canOverflow")]
    CanOverflow,
}

impl PreviewLevel {
    /// Wire name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewLevel::Full => "full",
            PreviewLevel::CanOverflow => "canOverflow",
        }
    }
}

impl fmt::Display for PreviewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as described by the protocol.
///
/// Exactly one of the payload fields is normally set: a JSON-representable
/// primitive in `value`, a reference to a remote object in `object`, or one
/// of the special encodings for values JSON cannot carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolValue {
    /// Property or entry name, when the value is part of a preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Primitive JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Remote object reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectId>,
    /// `NaN`, `Infinity`, `-Infinity` or `-0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unserializable_number: Option<String>,
    /// Decimal representation of a BigInt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bigint: Option<String>,
    /// Description of a Symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// The value could not be recovered at this pause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<bool>,
    /// Binding in its temporal dead zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uninitialized: Option<bool>,
}

impl ProtocolValue {
    /// A primitive value.
    pub fn primitive(value: serde_json::Value) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// A reference to a remote object.
    pub fn object(id: impl Into<ObjectId>) -> Self {
        Self {
            object: Some(id.into()),
            ..Default::default()
        }
    }

    /// Attach a name, as used for preview properties.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Key/value pair from a Map, Set or similar container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<ProtocolValue>,
    pub value: ProtocolValue,
}

/// Inlined summary data for a remote object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPreview {
    #[serde(default)]
    pub properties: Vec<ProtocolValue>,
    #[serde(default)]
    pub container_entries: Vec<ContainerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_entry_count: Option<u64>,
    #[serde(default)]
    pub getter_values: Vec<ProtocolValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype_id: Option<ObjectId>,
    /// Whether the preview may be incomplete. Only an explicit `false`
    /// marks it complete; a missing field is treated as possibly truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<bool>,
}

impl ObjectPreview {
    /// A preview the backend declared complete.
    pub fn complete() -> Self {
        Self {
            overflow: Some(false),
            ..Default::default()
        }
    }

    /// Whether the backend declared this preview complete.
    pub fn is_complete(&self) -> bool {
        self.overflow == Some(false)
    }
}

/// Descriptor for a debugged value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    pub object_id: ObjectId,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<ObjectPreview>,
}

impl RemoteObject {
    /// Create a descriptor without preview data.
    pub fn bare(object_id: impl Into<ObjectId>, class_name: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            class_name: class_name.into(),
            preview: None,
        }
    }

    /// Attach a preview.
    pub fn with_preview(mut self, preview: ObjectPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Whether this descriptor's preview may be truncated.
    ///
    /// A descriptor without any preview, or whose preview does not say
    /// `overflow: false`, counts as overflowing.
    pub fn is_overflowing(&self) -> bool {
        !self.preview.as_ref().is_some_and(ObjectPreview::is_complete)
    }

    /// Look up a preview property by name.
    pub fn property(&self, name: &str) -> Option<&ProtocolValue> {
        self.preview
            .as_ref()?
            .properties
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}

/// Response of `Pause.getObjectPreview`-style commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectsResponse {
    #[serde(default)]
    pub objects: Vec<RemoteObject>,
}

/// Response of a property lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
    /// Objects discovered while evaluating the property.
    #[serde(default)]
    pub objects: Vec<RemoteObject>,
    /// The property value itself.
    pub returned: ProtocolValue,
}
