//! Recording-backed protocol client.
//!
//! Serves object previews and property values from a JSON recording instead
//! of a live backend. Used by the CLI and by tests that want realistic
//! responses without a transport.
//!
//! # Recording format
//!
//! ```json
//! {
//!   "pauses": {
//!     "p1": {
//!       "objects": [{ "objectId": "o1", "className": "Array", "preview": { ... } }],
//!       "properties": { "o1": { "length": { "returned": { "value": 3 } } } }
//!     }
//!   }
//! }
//! ```
//!
//! Stored previews without an `overflow` flag are treated as complete. A `canOverflow` request truncates
//! the preview to [`OVERFLOW_PROPERTY_LIMIT`] properties and marks it as
//! overflowing when anything was cut. Objects referenced from the requested
//! preview are returned alongside it, the way a real backend inlines nested
//! values.

use super::client::{ProtocolClient, ProtocolError};
use super::types::{
    ObjectId, ObjectsResponse, PauseId, PreviewLevel, PropertyResponse, RemoteObject,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Number of preview properties kept for `canOverflow` requests.
pub const OVERFLOW_PROPERTY_LIMIT: usize = 10;

/// Error code returned for ids the recording does not contain.
pub const UNKNOWN_ENTRY_CODE: i64 = -32602;

/// Errors loading a recording.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse recording: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct Recording {
    #[serde(default)]
    pauses: HashMap<PauseId, RecordedPause>,
}

#[derive(Debug, Default, Deserialize)]
struct RecordedPause {
    #[serde(default)]
    objects: Vec<RemoteObject>,
    #[serde(default)]
    properties: HashMap<ObjectId, HashMap<String, PropertyResponse>>,
}

struct PauseIndex {
    objects: HashMap<ObjectId, RemoteObject>,
    properties: HashMap<ObjectId, HashMap<String, PropertyResponse>>,
}

/// Protocol client answering from a recorded session.
pub struct FixtureClient {
    pauses: HashMap<PauseId, PauseIndex>,
    latency: Duration,
    preview_calls: AtomicU64,
    property_calls: AtomicU64,
}

impl FixtureClient {
    /// Load a recording from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a recording from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let recording: Recording = serde_json::from_str(raw)?;

        let pauses = recording
            .pauses
            .into_iter()
            .map(|(pause_id, pause)| {
                let objects = pause
                    .objects
                    .into_iter()
                    .map(|mut o| {
                        if let Some(preview) = o.preview.as_mut() {
                            preview.overflow.get_or_insert(false);
                        }
                        (o.object_id.clone(), o)
                    })
                    .collect();
                (
                    pause_id,
                    PauseIndex {
                        objects,
                        properties: pause.properties,
                    },
                )
            })
            .collect();

        Ok(Self {
            pauses,
            latency: Duration::ZERO,
            preview_calls: AtomicU64::new(0),
            property_calls: AtomicU64::new(0),
        })
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of preview commands served so far.
    pub fn preview_calls(&self) -> u64 {
        self.preview_calls.load(Ordering::Relaxed)
    }

    /// Number of property commands served so far.
    pub fn property_calls(&self) -> u64 {
        self.property_calls.load(Ordering::Relaxed)
    }

    /// All pauses present in the recording.
    pub fn pause_ids(&self) -> Vec<PauseId> {
        let mut ids: Vec<_> = self.pauses.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every recorded object of a pause, as complete descriptors.
    pub fn recorded_objects(&self, pause_id: &PauseId) -> Vec<RemoteObject> {
        self.pauses
            .get(pause_id)
            .map(|p| p.objects.values().cloned().collect())
            .unwrap_or_default()
    }

    fn pause(&self, pause_id: &PauseId) -> Result<&PauseIndex, ProtocolError> {
        self.pauses.get(pause_id).ok_or_else(|| {
            ProtocolError::command(UNKNOWN_ENTRY_CODE, format!("unknown pause {}", pause_id))
        })
    }

    fn preview_response(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        level: PreviewLevel,
    ) -> Result<ObjectsResponse, ProtocolError> {
        let pause = self.pause(pause_id)?;
        let object = pause.objects.get(object_id).ok_or_else(|| {
            ProtocolError::command(
                UNKNOWN_ENTRY_CODE,
                format!("unknown object {} in pause {}", object_id, pause_id),
            )
        })?;

        let requested = shape(object, level);
        let mut objects = Vec::with_capacity(1);

        // Nested objects are inlined at the weaker fidelity.
        if let Some(preview) = &requested.preview {
            for nested in preview.properties.iter().filter_map(|p| p.object.as_ref()) {
                if nested == object_id {
                    continue;
                }
                if let Some(nested) = pause.objects.get(nested) {
                    objects.push(shape(nested, PreviewLevel::CanOverflow));
                }
            }
        }
        objects.push(requested);

        Ok(ObjectsResponse { objects })
    }

    fn property_response(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        name: &str,
    ) -> Result<PropertyResponse, ProtocolError> {
        let pause = self.pause(pause_id)?;
        pause
            .properties
            .get(object_id)
            .and_then(|props| props.get(name))
            .cloned()
            .ok_or_else(|| {
                ProtocolError::command(
                    UNKNOWN_ENTRY_CODE,
                    format!("no recorded property {}.{} in pause {}", object_id, name, pause_id),
                )
            })
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Produce the descriptor a backend would send for `level`.
fn shape(object: &RemoteObject, level: PreviewLevel) -> RemoteObject {
    let mut shaped = object.clone();
    if let Some(preview) = shaped.preview.as_mut() {
        match level {
            PreviewLevel::Full => preview.overflow = Some(false),
            PreviewLevel::CanOverflow => {
                if preview.properties.len() > OVERFLOW_PROPERTY_LIMIT {
                    preview.properties.truncate(OVERFLOW_PROPERTY_LIMIT);
                    preview.overflow = Some(true);
                }
            }
        }
    }
    shaped
}

impl ProtocolClient for FixtureClient {
    async fn get_object_with_preview(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        level: PreviewLevel,
    ) -> Result<ObjectsResponse, ProtocolError> {
        self.preview_calls.fetch_add(1, Ordering::Relaxed);
        debug!(pause = %pause_id, object = %object_id, level = %level, "Fixture preview request");
        self.simulate_latency().await;
        self.preview_response(object_id, pause_id, level)
    }

    async fn get_object_property(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        name: &str,
    ) -> Result<PropertyResponse, ProtocolError> {
        self.property_calls.fetch_add(1, Ordering::Relaxed);
        debug!(pause = %pause_id, object = %object_id, property = name, "Fixture property request");
        self.simulate_latency().await;
        self.property_response(object_id, pause_id, name)
    }
}
