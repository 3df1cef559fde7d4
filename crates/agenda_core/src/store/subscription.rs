//! Snapshot subscriptions.
//!
//! # Responsibility
//! - Deliver immutable full-collection snapshots to subscribers.
//! - Let subscribers cancel by dropping their handle.
//!
//! # Invariants
//! - A new subscription sees the snapshot current at subscribe time first.
//! - Every committed mutation replaces the scope's snapshot; a subscriber
//!   that falls behind observes only the newest one, never an older one.
//! - A scope whose receivers are all dropped reports itself idle and can be
//!   released by the publisher.

use std::sync::Arc;
use tokio::sync::watch;

/// Immutable full view of one collection at a store revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    revision: u64,
    items: Vec<T>,
}

impl<T> Snapshot<T> {
    pub fn new(revision: u64, items: Vec<T>) -> Self {
        Self { revision, items }
    }

    /// Store revision this snapshot was taken at; increases monotonically.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cancellable handle yielding snapshots. Dropping it cancels.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<Arc<Snapshot<T>>>,
}

impl<T> Subscription<T> {
    /// Newest snapshot not yet seen by this handle, without blocking.
    pub fn latest(&mut self) -> Option<Arc<Snapshot<T>>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(Arc::clone(&self.receiver.borrow_and_update())),
            Ok(false) | Err(_) => None,
        }
    }

    /// Explicit cancellation; equivalent to dropping the handle.
    pub fn cancel(self) {}
}

/// Publisher side of one subscription scope.
#[derive(Debug)]
pub(crate) struct SnapshotChannel<T> {
    sender: watch::Sender<Arc<Snapshot<T>>>,
}

impl<T> SnapshotChannel<T> {
    pub(crate) fn new(initial: Snapshot<T>) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// Revision of the snapshot subscribers currently see.
    pub(crate) fn revision(&self) -> u64 {
        self.sender.borrow().revision()
    }

    /// New handle whose first `latest` returns the current snapshot.
    pub(crate) fn subscribe(&self) -> Subscription<T> {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        Subscription { receiver }
    }

    /// Replaces the current snapshot; returns how many handles will see it.
    pub(crate) fn publish(&self, snapshot: Snapshot<T>) -> usize {
        self.sender.send_replace(Arc::new(snapshot));
        self.sender.receiver_count()
    }

    /// True once every handle has been dropped.
    pub(crate) fn is_idle(&self) -> bool {
        self.sender.receiver_count() == 0
    }
}
