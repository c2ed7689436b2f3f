//! In-memory change notifier.
//!
//! Fans table-changed signals out to subscribers through tokio broadcast
//! channels, one channel per table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use hoststore_core::notify::{ChangeNotifier, Result, TableChanged};

use crate::config::Config;

/// In-memory change notifier.
///
/// Channels are created lazily on first publish or subscribe. A slow
/// subscriber that falls more than `capacity` signals behind observes
/// `RecvError::Lagged` instead of blocking publishers.
#[derive(Debug, Clone)]
pub struct MemoryChangeNotifier {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<TableChanged>>>>,
    capacity: usize,
}

impl MemoryChangeNotifier {
    /// Creates a notifier with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(Config::DEFAULT_CHANGE_CHANNEL_CAPACITY)
    }

    /// Creates a notifier buffering up to `capacity` signals per table.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    async fn get_or_create_channel(&self, table: &str) -> broadcast::Sender<TableChanged> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(table) {
                return sender.clone();
            }
        }

        let mut channels = self.channels.write().await;

        // Double-check after acquiring write lock
        if let Some(sender) = channels.get(table) {
            return sender.clone();
        }

        let (sender, _) = broadcast::channel(self.capacity);
        channels.insert(table.to_string(), sender.clone());
        sender
    }
}

impl Default for MemoryChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeNotifier for MemoryChangeNotifier {
    async fn publish(&self, change: &TableChanged) -> Result<()> {
        let sender = self.get_or_create_channel(&change.table).await;

        // No receivers just means nobody is watching this table.
        let receivers = sender.send(change.clone()).unwrap_or(0);
        tracing::trace!(
            table = %change.table,
            operation = ?change.operation,
            receivers,
            "Published table change"
        );

        Ok(())
    }

    async fn subscribe(&self, table: &str) -> Result<broadcast::Receiver<TableChanged>> {
        let sender = self.get_or_create_channel(table).await;
        Ok(sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoststore_core::notify::{ChangeOperation, HOSTS_TABLE};
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let notifier = MemoryChangeNotifier::new();
        let change = TableChanged::hosts(ChangeOperation::Insert, 1);

        let mut receiver = notifier.subscribe(HOSTS_TABLE).await.unwrap();
        notifier.publish(&change).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap(), change);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let notifier = MemoryChangeNotifier::new();
        let change = TableChanged::hosts(ChangeOperation::Delete, 2);

        let mut receiver1 = notifier.subscribe(HOSTS_TABLE).await.unwrap();
        let mut receiver2 = notifier.subscribe(HOSTS_TABLE).await.unwrap();

        notifier.publish(&change).await.unwrap();

        assert_eq!(receiver1.recv().await.unwrap(), change);
        assert_eq!(receiver2.recv().await.unwrap(), change);
    }

    #[tokio::test]
    async fn test_tables_are_isolated() {
        let notifier = MemoryChangeNotifier::new();

        let mut hosts = notifier.subscribe(HOSTS_TABLE).await.unwrap();
        let mut other = notifier.subscribe("known_hosts").await.unwrap();

        notifier
            .publish(&TableChanged::hosts(ChangeOperation::Update, 1))
            .await
            .unwrap();

        assert!(hosts.recv().await.is_ok());
        assert!(matches!(other.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let notifier = MemoryChangeNotifier::new();
        let result = notifier
            .publish(&TableChanged::hosts(ChangeOperation::Insert, 1))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_channel_reuse() {
        let notifier = MemoryChangeNotifier::new();

        let _receiver1 = notifier.subscribe(HOSTS_TABLE).await.unwrap();
        let _receiver2 = notifier.subscribe(HOSTS_TABLE).await.unwrap();

        let channels = notifier.channels.read().await;
        assert_eq!(channels.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let notifier = MemoryChangeNotifier::with_capacity(2);
        let mut receiver = notifier.subscribe(HOSTS_TABLE).await.unwrap();

        for _ in 0..5 {
            notifier
                .publish(&TableChanged::hosts(ChangeOperation::Update, 1))
                .await
                .unwrap();
        }

        assert!(matches!(receiver.recv().await, Err(RecvError::Lagged(3))));
    }
}
