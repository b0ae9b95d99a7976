//! Async helpers over the suspending readers.
//!
//! Code outside a render pass has no scheduler to retry a suspended read.
//! These helpers do the waiting themselves, so async call sites share the
//! same records (and the same in-flight fetches) as rendering code.

use crate::cache::object_cache::ObjectCache;
use crate::cache::types::{ObjectCacheError, Suspense, Tier};
use crate::protocol::{ObjectId, PauseId, ProtocolClient, ProtocolValue, RemoteObject};

/// Turn the outcome of a suspending read into a plain async result.
///
/// A value passes through, a stored error is returned unchanged, and
/// `NotReady` is awaited.
pub async fn settle<T>(read: Result<T, Suspense<T>>) -> Result<T, ObjectCacheError>
where
    T: Clone + Send + Sync + 'static,
{
    match read {
        Ok(value) => Ok(value),
        Err(Suspense::NotReady(awaitable)) => awaitable.await,
        Err(Suspense::Failed(e)) => Err(e),
    }
}

impl<C: ProtocolClient> ObjectCache<C> {
    /// Async form of [`read_object`](Self::read_object).
    pub async fn read_object_async(
        &self,
        pause_id: &PauseId,
        object_id: &ObjectId,
        tier: Tier,
    ) -> Result<RemoteObject, ObjectCacheError> {
        settle(self.read_object(pause_id, object_id, tier)).await
    }

    /// Async form of [`read_property`](Self::read_property).
    pub async fn read_property_async(
        &self,
        pause_id: &PauseId,
        object_id: &ObjectId,
        name: &str,
    ) -> Result<ProtocolValue, ObjectCacheError> {
        settle(self.read_property(pause_id, object_id, name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::record::Record;

    #[tokio::test]
    async fn test_settle_passes_values_through() {
        let read: Result<u32, Suspense<u32>> = Ok(3);
        assert_eq!(settle(read).await, Ok(3));
    }

    #[tokio::test]
    async fn test_settle_returns_stored_error() {
        let read: Result<u32, Suspense<u32>> = Err(Suspense::Failed(ObjectCacheError::Abandoned));
        assert_eq!(settle(read).await, Err(ObjectCacheError::Abandoned));
    }

    #[tokio::test]
    async fn test_settle_awaits_pending_record() {
        let record = std::sync::Arc::new(Record::pending());
        let read: Result<u32, Suspense<u32>> = Err(Suspense::NotReady(record.awaitable()));

        let settler = std::sync::Arc::clone(&record);
        tokio::spawn(async move { settler.resolve(11) });

        assert_eq!(settle(read).await, Ok(11));
    }
}
