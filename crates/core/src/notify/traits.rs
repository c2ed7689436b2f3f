use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{Result, TableChanged};

/// Fan-out of table-changed signals to any number of listeners.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Announces a committed change. Having no listeners is not an error.
    async fn publish(&self, change: &TableChanged) -> Result<()>;

    /// Subscribes to changes for one table.
    async fn subscribe(&self, table: &str) -> Result<broadcast::Receiver<TableChanged>>;
}
