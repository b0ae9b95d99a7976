//! Tri-state cache slots.
//!
//! A [`Record`] starts `Pending` and settles exactly once, in place, to
//! `Resolved` or `Rejected`. The cache maps hold `Arc<Record<T>>`, and the
//! placeholder installed on a miss is the same instance the fetch later
//! settles. Waiters observe the outcome through an [`Awaitable`] backed by a
//! `watch` channel owned by the record.

use crate::cache::types::ObjectCacheError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::IntoFuture;
use tokio::sync::watch;

#[derive(Debug, Clone)]
enum Slot<T> {
    Pending,
    Resolved(T),
    Rejected(ObjectCacheError),
}

impl<T> Slot<T> {
    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }
}

/// Observable state of a record.
#[derive(Debug)]
pub enum RecordState<T> {
    /// Not settled yet; await the handle to learn the outcome.
    Pending(Awaitable<T>),
    Resolved(T),
    Rejected(ObjectCacheError),
}

/// A cache slot with a `Pending -> Resolved | Rejected` lifecycle.
pub struct Record<T> {
    slot: watch::Sender<Slot<T>>,
}

impl<T: Clone> Record<T> {
    /// Create a pending record.
    pub fn pending() -> Self {
        let (slot, _) = watch::channel(Slot::Pending);
        Self { slot }
    }

    /// Create a record that is already resolved.
    pub fn resolved(value: T) -> Self {
        let (slot, _) = watch::channel(Slot::Resolved(value));
        Self { slot }
    }

    /// Snapshot the current state.
    pub fn state(&self) -> RecordState<T> {
        let settled = match &*self.slot.borrow() {
            Slot::Pending => None,
            Slot::Resolved(v) => Some(RecordState::Resolved(v.clone())),
            Slot::Rejected(e) => Some(RecordState::Rejected(e.clone())),
        };
        // Subscribed after the borrow is released. A settle in between is
        // still observed by the awaitable.
        settled.unwrap_or_else(|| RecordState::Pending(self.awaitable()))
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<T> {
        match &*self.slot.borrow() {
            Slot::Resolved(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_pending()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Resolved(_))
    }

    /// Settle to `Resolved`. Returns false if the record had already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Slot::Resolved(value))
    }

    /// Settle to `Rejected`. Returns false if the record had already settled.
    pub fn reject(&self, error: ObjectCacheError) -> bool {
        self.settle(Slot::Rejected(error))
    }

    /// A handle that completes when this record settles.
    pub fn awaitable(&self) -> Awaitable<T> {
        Awaitable {
            rx: self.slot.subscribe(),
        }
    }

    fn settle(&self, outcome: Slot<T>) -> bool {
        let mut outcome = Some(outcome);
        self.slot.send_if_modified(|slot| {
            if !slot.is_pending() {
                return false;
            }
            if let Some(outcome) = outcome.take() {
                *slot = outcome;
            }
            true
        })
    }
}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.slot.borrow() {
            Slot::Pending => "pending",
            Slot::Resolved(_) => "resolved",
            Slot::Rejected(_) => "rejected",
        };
        f.debug_struct("Record").field("state", &state).finish()
    }
}

/// Deferred outcome of a [`Record`].
///
/// Cloneable; every clone observes the same settlement.
pub struct Awaitable<T> {
    rx: watch::Receiver<Slot<T>>,
}

impl<T: Clone> Awaitable<T> {
    /// Wait for the record to settle.
    pub async fn wait(mut self) -> Result<T, ObjectCacheError> {
        let slot = self
            .rx
            .wait_for(|slot| !slot.is_pending())
            .await
            .map_err(|_| ObjectCacheError::Abandoned)?;

        match &*slot {
            Slot::Resolved(v) => Ok(v.clone()),
            Slot::Rejected(e) => Err(e.clone()),
            Slot::Pending => Err(ObjectCacheError::Abandoned),
        }
    }
}

impl<T> Clone for Awaitable<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> fmt::Debug for Awaitable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Awaitable").finish_non_exhaustive()
    }
}

impl<T> IntoFuture for Awaitable<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, ObjectCacheError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.wait().boxed()
    }
}
