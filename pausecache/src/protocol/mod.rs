//! Debugging protocol surface consumed by the object cache.
//!
//! Holds the descriptor types shared with the backend, the
//! [`ProtocolClient`] seam the cache fetches through, and a
//! recording-backed client for offline use.

mod client;
mod fixture;
mod types;

pub use client::{ProtocolClient, ProtocolError};
pub use fixture::{FixtureClient, FixtureError, OVERFLOW_PROPERTY_LIMIT, UNKNOWN_ENTRY_CODE};
pub use types::{
    ContainerEntry, ObjectId, ObjectPreview, ObjectsResponse, PauseId, PreviewLevel,
    PropertyResponse, ProtocolValue, RemoteObject,
};
