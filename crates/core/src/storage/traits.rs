use async_trait::async_trait;

use crate::host::HostRecord;

use super::Result;

/// Repository for host profile operations.
///
/// Every mutation runs as one atomic transaction: it either fully commits or
/// leaves no trace.
#[async_trait]
pub trait HostRepository: Send + Sync {
    /// Gets a host by its ID, `None` when absent.
    async fn get_host(&self, id: i64) -> Result<Option<HostRecord>>;

    /// Gets all hosts ordered by sort order, then name.
    async fn get_all_hosts(&self) -> Result<Vec<HostRecord>>;

    /// Returns the number of stored hosts.
    async fn count_hosts(&self) -> Result<u64>;

    /// Inserts a host, replacing any row with the same ID.
    ///
    /// An ID of 0 asks the store to assign one. Returns the row's ID.
    async fn insert_host(&self, host: &HostRecord) -> Result<i64>;

    /// Inserts every host in a single transaction with replace-by-ID semantics.
    async fn insert_hosts(&self, hosts: &[HostRecord]) -> Result<()>;

    /// Replaces every column of the row keyed by `host.id`.
    ///
    /// Updating a missing row is a successful no-op.
    async fn update_host(&self, host: &HostRecord) -> Result<()>;

    /// Deletes the row keyed by `host.id`.
    async fn delete_host(&self, host: &HostRecord) -> Result<()> {
        self.delete_host_by_id(host.id).await
    }

    /// Deletes a host by its ID. Deleting a missing row is a no-op.
    async fn delete_host_by_id(&self, id: i64) -> Result<()>;

    /// Deletes every host.
    async fn delete_all_hosts(&self) -> Result<()>;

    /// Records the last successful connection time (epoch milliseconds).
    async fn update_last_connected(&self, id: i64, timestamp: i64) -> Result<()>;

    /// Moves a host to a new display position.
    async fn update_sort_order(&self, id: i64, order: i32) -> Result<()>;
}
