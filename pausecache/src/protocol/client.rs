//! Protocol client seam.
//!
//! The object cache never talks to the wire directly. It depends on this
//! trait, and the host application supplies the transport.

use super::types::{ObjectId, ObjectsResponse, PauseId, PreviewLevel, PropertyResponse};
use std::future::Future;
use thiserror::Error;

/// Errors surfaced by a protocol client.
///
/// `Clone` because a failed fetch is stored in its cache record and handed to
/// every reader of that key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Connection dropped, socket closed, etc.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend rejected the command.
    #[error("Command failed ({code}): {message}")]
    Command { code: i64, message: String },

    /// The backend answered with something that could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProtocolError {
    /// Shorthand for a backend command failure.
    pub fn command(code: i64, message: impl Into<String>) -> Self {
        Self::Command {
            code,
            message: message.into(),
        }
    }
}

/// Commands the object cache issues against the debugging protocol.
///
/// # Example
///
/// ```ignore
/// use pausecache::protocol::{ProtocolClient, PreviewLevel};
///
/// async fn preview<C: ProtocolClient>(client: &C) {
///     let response = client
///         .get_object_with_preview(&"o1".into(), &"p1".into(), PreviewLevel::Full)
///         .await?;
///     println!("{} objects", response.objects.len());
/// }
/// ```
pub trait ProtocolClient: Send + Sync + 'static {
    /// Fetch an object's preview at the requested fidelity.
    ///
    /// The response may include any number of additional, unrelated objects.
    fn get_object_with_preview(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        level: PreviewLevel,
    ) -> impl Future<Output = Result<ObjectsResponse, ProtocolError>> + Send;

    /// Evaluate a single named property of an object.
    fn get_object_property(
        &self,
        object_id: &ObjectId,
        pause_id: &PauseId,
        name: &str,
    ) -> impl Future<Output = Result<PropertyResponse, ProtocolError>> + Send;
}
