//! Change-announcing repository decorator.
//!
//! Wraps a [`HostRepository`] so that every committed mutation publishes a
//! [`TableChanged`] signal, and hands out live [`HostSubscription`]s fed by
//! those signals.

use std::sync::Arc;

use async_trait::async_trait;

use hoststore_core::host::HostRecord;
use hoststore_core::notify::{ChangeNotifier, ChangeOperation, TableChanged, HOSTS_TABLE};
use hoststore_core::storage::{HostRepository, RepositoryError, Result};

use super::sqlite::SqliteHostRepository;
use crate::config::Config;
use crate::notify::MemoryChangeNotifier;
use crate::subscription::HostSubscription;

/// Repository decorator that announces writes.
///
/// - **Reads**: forwarded unchanged.
/// - **Writes**: forwarded; on success a signal is published for the hosts
///   table. A failed write publishes nothing.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `N` - The notifier carrying table-changed signals
pub struct ObservedHostRepository<R, N>
where
    R: HostRepository,
    N: ChangeNotifier,
{
    repository: Arc<R>,
    notifier: Arc<N>,
}

/// The SQLite-backed store with in-process change notification.
pub type HostStore = ObservedHostRepository<SqliteHostRepository, MemoryChangeNotifier>;

impl HostStore {
    /// Opens the store described by `config`.
    pub async fn open(config: &Config) -> Result<Self> {
        let repository = SqliteHostRepository::open(config).await?;
        let notifier = MemoryChangeNotifier::with_capacity(config.change_channel_capacity);
        Ok(Self::new(Arc::new(repository), Arc::new(notifier)))
    }

    /// Opens a store backed by an in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let repository = SqliteHostRepository::open_in_memory().await?;
        Ok(Self::new(
            Arc::new(repository),
            Arc::new(MemoryChangeNotifier::new()),
        ))
    }

    /// See [`SqliteHostRepository::data_version`].
    pub async fn data_version(&self) -> Result<i64> {
        self.repository.data_version().await
    }
}

impl<R, N> ObservedHostRepository<R, N>
where
    R: HostRepository + 'static,
    N: ChangeNotifier,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Subscribes to the ordered list of all hosts.
    ///
    /// The returned subscription already holds the current snapshot, which
    /// its first `next()` yields.
    pub async fn subscribe_all(&self) -> Result<HostSubscription> {
        let changes = self
            .notifier
            .subscribe(HOSTS_TABLE)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        let repository: Arc<dyn HostRepository> = self.repository.clone();
        HostSubscription::open(repository, changes).await
    }

    /// Sort order that places a new host after every existing one.
    pub async fn next_sort_order(&self) -> Result<i32> {
        let count = self.repository.count_hosts().await?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    /// Signals subscribers about a commit made outside this repository.
    pub async fn announce_external_change(&self) {
        self.announce(ChangeOperation::Update, 0).await;
    }

    async fn announce(&self, operation: ChangeOperation, rows: u64) {
        let change = TableChanged::hosts(operation, rows);
        if let Err(err) = self.notifier.publish(&change).await {
            tracing::warn!(
                table = %change.table,
                operation = ?change.operation,
                error = %err,
                "Failed to publish table change"
            );
        }
    }
}

#[async_trait]
impl<R, N> HostRepository for ObservedHostRepository<R, N>
where
    R: HostRepository + 'static,
    N: ChangeNotifier + 'static,
{
    async fn get_host(&self, id: i64) -> Result<Option<HostRecord>> {
        self.repository.get_host(id).await
    }

    async fn get_all_hosts(&self) -> Result<Vec<HostRecord>> {
        self.repository.get_all_hosts().await
    }

    async fn count_hosts(&self) -> Result<u64> {
        self.repository.count_hosts().await
    }

    async fn insert_host(&self, host: &HostRecord) -> Result<i64> {
        let id = self.repository.insert_host(host).await?;
        self.announce(ChangeOperation::Insert, 1).await;
        Ok(id)
    }

    async fn insert_hosts(&self, hosts: &[HostRecord]) -> Result<()> {
        self.repository.insert_hosts(hosts).await?;
        self.announce(ChangeOperation::Insert, hosts.len() as u64).await;
        Ok(())
    }

    async fn update_host(&self, host: &HostRecord) -> Result<()> {
        self.repository.update_host(host).await?;
        self.announce(ChangeOperation::Update, 1).await;
        Ok(())
    }

    async fn delete_host_by_id(&self, id: i64) -> Result<()> {
        self.repository.delete_host_by_id(id).await?;
        self.announce(ChangeOperation::Delete, 1).await;
        Ok(())
    }

    async fn delete_all_hosts(&self) -> Result<()> {
        self.repository.delete_all_hosts().await?;
        self.announce(ChangeOperation::Delete, 0).await;
        Ok(())
    }

    async fn update_last_connected(&self, id: i64, timestamp: i64) -> Result<()> {
        self.repository.update_last_connected(id, timestamp).await?;
        self.announce(ChangeOperation::Update, 1).await;
        Ok(())
    }

    async fn update_sort_order(&self, id: i64, order: i32) -> Result<()> {
        self.repository.update_sort_order(id, order).await?;
        self.announce(ChangeOperation::Update, 1).await;
        Ok(())
    }
}
