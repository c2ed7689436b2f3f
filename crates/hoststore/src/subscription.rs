//! Live "all hosts, ordered" query subscriptions.
//!
//! A [`HostSubscription`] holds the last snapshot it delivered and re-runs
//! `get_all_hosts` whenever the hosts table changes. Snapshots equal to the
//! previous delivery are swallowed. Cancellation and lifecycle state go
//! through shared watch cells, so a [`SubscriptionHandle`] can observe or stop
//! delivery from any task.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::watch;
use tokio_stream::Stream;

use hoststore_core::host::HostRecord;
use hoststore_core::notify::TableChanged;
use hoststore_core::storage::{HostRepository, Result};

/// Lifecycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Waiting for the next table change.
    Active,
    /// Re-running the query after a table change.
    Recomputing,
    /// Detached. No further snapshots are delivered.
    Cancelled,
}

/// Observes or cancels a [`HostSubscription`] from outside the task
/// consuming it.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    cancel: Arc<watch::Sender<bool>>,
    state: Arc<watch::Sender<SubscriptionState>>,
}

impl SubscriptionHandle {
    /// Stops the subscription. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        let was_cancelled = self.cancel.send_replace(true);
        if !was_cancelled {
            tracing::debug!("Subscription cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Current lifecycle state.
    ///
    /// `Recomputing` is visible here while the consuming task is inside
    /// [`HostSubscription::next`] re-running the query.
    pub fn state(&self) -> SubscriptionState {
        if self.is_cancelled() {
            SubscriptionState::Cancelled
        } else {
            *self.state.borrow()
        }
    }
}

/// A live, cancellable sequence of ordered host snapshots.
///
/// The first call to [`next`](Self::next) yields the snapshot taken when the
/// subscription was opened. Later calls wait for a table change, re-query, and
/// yield the result if it differs from the last delivery.
pub struct HostSubscription {
    repository: Arc<dyn HostRepository>,
    changes: broadcast::Receiver<TableChanged>,
    cancelled: watch::Receiver<bool>,
    handle: SubscriptionHandle,
    initial: Option<Vec<HostRecord>>,
    last: Option<Vec<HostRecord>>,
}

impl HostSubscription {
    /// Takes the initial snapshot.
    ///
    /// `changes` must already be subscribed so that no commit between the
    /// initial read and the first wait goes unnoticed.
    pub async fn open(
        repository: Arc<dyn HostRepository>,
        changes: broadcast::Receiver<TableChanged>,
    ) -> Result<Self> {
        let initial = repository.get_all_hosts().await?;
        let (cancel, cancelled) = watch::channel(false);

        tracing::debug!(hosts = initial.len(), "Opened host subscription");

        Ok(Self {
            repository,
            changes,
            cancelled,
            handle: SubscriptionHandle {
                cancel: Arc::new(cancel),
                state: Arc::new(watch::Sender::new(SubscriptionState::Active)),
            },
            initial: Some(initial),
            last: None,
        })
    }

    /// Returns a handle that can cancel this subscription.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Cancels the subscription.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn state(&self) -> SubscriptionState {
        self.handle.state()
    }

    /// The last snapshot delivered, if any.
    pub fn current(&self) -> Option<&[HostRecord]> {
        self.last.as_deref()
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    fn set_state(&self, state: SubscriptionState) {
        self.handle.state.send_replace(state);
    }

    /// Waits for the next distinct snapshot.
    ///
    /// Returns `None` once the subscription is cancelled or the change
    /// channel closes.
    pub async fn next(&mut self) -> Option<Vec<HostRecord>> {
        if self.is_cancelled() {
            self.set_state(SubscriptionState::Cancelled);
            return None;
        }

        if let Some(initial) = self.initial.take() {
            self.last = Some(initial.clone());
            return Some(initial);
        }

        loop {
            self.set_state(SubscriptionState::Active);

            tokio::select! {
                biased;

                _ = self.cancelled.changed() => {}
                result = self.changes.recv() => match result {
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => {
                        tracing::debug!(lagged = n, "Subscription lagged, recomputing");
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Change channel closed, ending subscription");
                        self.handle.state.send_replace(SubscriptionState::Cancelled);
                        return None;
                    }
                },
            }

            if self.is_cancelled() {
                self.set_state(SubscriptionState::Cancelled);
                return None;
            }

            self.drain_pending();
            self.set_state(SubscriptionState::Recomputing);
            let result = self.repository.get_all_hosts().await;

            // A cancel issued while the query ran still wins.
            if self.is_cancelled() {
                self.set_state(SubscriptionState::Cancelled);
                return None;
            }
            self.set_state(SubscriptionState::Active);

            match result {
                Ok(snapshot) if self.last.as_ref() == Some(&snapshot) => {
                    tracing::trace!(hosts = snapshot.len(), "Suppressed unchanged snapshot");
                }
                Ok(snapshot) => {
                    self.last = Some(snapshot.clone());
                    return Some(snapshot);
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "Subscription recompute failed, waiting for next change"
                    );
                }
            }
        }
    }

    /// Drops signals that queued up while waiting; one recompute covers them.
    fn drain_pending(&mut self) {
        let mut skipped = 0u64;
        loop {
            match self.changes.try_recv() {
                Ok(_) => skipped += 1,
                Err(TryRecvError::Lagged(n)) => skipped += n,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if skipped > 0 {
            tracing::trace!(skipped, "Coalesced pending table changes");
        }
    }

    /// Converts the subscription into a stream of snapshots.
    pub fn into_stream(self) -> impl Stream<Item = Vec<HostRecord>> + Send {
        let mut subscription = self;
        async_stream::stream! {
            while let Some(snapshot) = subscription.next().await {
                yield snapshot;
            }
        }
    }
}
