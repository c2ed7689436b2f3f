//! SQLite repository implementation.
//!
//! Implements [`HostRepository`] from `hoststore_core::storage` using SQLite.
//! File databases run in WAL mode with one writer and one reader connection,
//! so reads keep completing while a write transaction is open. Every mutation
//! runs inside a `BEGIN IMMEDIATE` transaction on the writer.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OpenFlags, TransactionBehavior};
use tokio_rusqlite::Connection;

use hoststore_core::host::HostRecord;
use hoststore_core::storage::{HostRepository, RepositoryError, Result};

use super::conversions::{host_to_insert_row, host_to_row, row_to_host};
use super::error::{map_tokio_rusqlite_error, wrap_err};
use super::schema;
use super::statements::{self, MutationStatement};
use crate::config::Config;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite-based host repository.
pub struct SqliteHostRepository {
    writer: Connection,
    reader: Connection,
}

impl SqliteHostRepository {
    /// Opens the database described by `config`.
    ///
    /// The database file is created if it doesn't exist. A file whose schema
    /// version differs from [`schema::SCHEMA_VERSION`] is reset.
    pub async fn open(config: &Config) -> Result<Self> {
        if config.is_in_memory() {
            return Self::open_in_memory_with_capacity(config.statement_cache_capacity).await;
        }

        let writer = Connection::open(&config.database_path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Self::init_writer(&writer, config.statement_cache_capacity, true).await?;

        let reader = Connection::open_with_flags(
            &config.database_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Self::init_reader(&reader, config.statement_cache_capacity).await?;

        tracing::info!(path = %config.database_path, "Opened host database");

        Ok(Self { writer, reader })
    }

    /// Creates a repository backed by an in-memory database.
    ///
    /// Useful for testing - data is lost when the repository is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_capacity(Config::DEFAULT_STATEMENT_CACHE_CAPACITY).await
    }

    async fn open_in_memory_with_capacity(capacity: usize) -> Result<Self> {
        let writer = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Self::init_writer(&writer, capacity, false).await?;

        // A private in-memory database is only visible to its own connection.
        let reader = writer.clone();

        Ok(Self { writer, reader })
    }

    async fn init_writer(conn: &Connection, capacity: usize, wal: bool) -> Result<()> {
        conn.call(move |conn| {
            configure_writer(conn, capacity, wal).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    async fn init_reader(conn: &Connection, capacity: usize) -> Result<()> {
        conn.call(move |conn| {
            conn.busy_timeout(BUSY_TIMEOUT).map_err(wrap_err)?;
            conn.set_prepared_statement_cache_capacity(capacity);
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    /// Returns the reader's `PRAGMA data_version`.
    ///
    /// The value changes whenever another connection commits to the database
    /// file, which lets a process notice writes made by other processes.
    pub async fn data_version(&self) -> Result<i64> {
        self.reader
            .call(|conn| {
                conn.pragma_query_value(None, "data_version", |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    /// Runs one cached mutation statement in its own transaction.
    async fn execute_mutation(
        &self,
        statement: MutationStatement,
        params: Vec<Value>,
    ) -> Result<usize> {
        self.writer
            .call(move |conn| {
                run_in_transaction(conn, statement.name(), |tx| {
                    statements::execute(tx, statement, params_from_iter(params))
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

// ============================================================================
// Connection setup
// ============================================================================

fn configure_writer(
    conn: &mut rusqlite::Connection,
    capacity: usize,
    wal: bool,
) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if wal {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "Configured journal mode");
    }
    init_schema(conn)?;
    conn.set_prepared_statement_cache_capacity(capacity);
    Ok(())
}

/// Creates the schema, dropping an incompatible one first.
fn init_schema(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    run_in_transaction(conn, "init_schema", |tx| {
        let version: i64 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version != schema::SCHEMA_VERSION {
            let existing: i64 = tx.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'hosts'",
                [],
                |row| row.get(0),
            )?;
            if existing > 0 {
                tracing::warn!(
                    found = version,
                    expected = schema::SCHEMA_VERSION,
                    "Schema version mismatch, discarding stored hosts"
                );
            }
            tx.execute_batch(schema::DROP_TABLES)?;
            tx.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        }
        tx.execute_batch(schema::CREATE_TABLES)
    })
}

/// Runs `f` inside an immediate transaction.
///
/// Commits when `f` succeeds and rolls back when it fails.
fn run_in_transaction<T>(
    conn: &mut rusqlite::Connection,
    operation: &'static str,
    f: impl FnOnce(&rusqlite::Connection) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(operation, error = %rollback_err, "Rollback failed");
            }
            tracing::debug!(operation, error = %err, "Rolled back transaction");
            Err(err)
        }
    }
}

// ============================================================================
// HostRepository implementation
// ============================================================================

#[async_trait]
impl HostRepository for SqliteHostRepository {
    async fn get_host(&self, id: i64) -> Result<Option<HostRecord>> {
        self.reader
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_HOST_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_host) {
                    Ok(host) => Ok(Some(host)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn get_all_hosts(&self) -> Result<Vec<HostRecord>> {
        self.reader
            .call(|conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_ALL_HOSTS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_host).map_err(wrap_err)?;

                let mut hosts = Vec::new();
                for row_result in rows {
                    hosts.push(row_result.map_err(wrap_err)?);
                }
                Ok(hosts)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn count_hosts(&self) -> Result<u64> {
        let count = self
            .reader
            .call(|conn| {
                conn.query_row(schema::COUNT_HOSTS, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn insert_host(&self, host: &HostRecord) -> Result<i64> {
        let row = host_to_insert_row(host);

        let id = self
            .writer
            .call(move |conn| {
                run_in_transaction(conn, "insert", |tx| {
                    tx.prepare_cached(schema::UPSERT_HOST)?
                        .execute(params_from_iter(row))?;
                    Ok(tx.last_insert_rowid())
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        tracing::debug!(id, "Inserted host");
        Ok(id)
    }

    async fn insert_hosts(&self, hosts: &[HostRecord]) -> Result<()> {
        let rows: Vec<_> = hosts.iter().map(host_to_insert_row).collect();
        let count = rows.len();

        self.writer
            .call(move |conn| {
                run_in_transaction(conn, "bulk_insert", |tx| {
                    let mut stmt = tx.prepare_cached(schema::UPSERT_HOST)?;
                    for row in rows {
                        stmt.execute(params_from_iter(row))?;
                    }
                    Ok(())
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        tracing::debug!(count, "Inserted hosts");
        Ok(())
    }

    async fn update_host(&self, host: &HostRecord) -> Result<()> {
        let row = host_to_row(host);
        let id = host.id;

        let rows = self
            .writer
            .call(move |conn| {
                run_in_transaction(conn, "update", |tx| {
                    tx.prepare_cached(schema::UPDATE_HOST)?
                        .execute(params_from_iter(row))
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        tracing::debug!(id, rows, "Updated host");
        Ok(())
    }

    async fn delete_host_by_id(&self, id: i64) -> Result<()> {
        let rows = self
            .execute_mutation(MutationStatement::DeleteById, vec![Value::Integer(id)])
            .await?;
        tracing::debug!(id, rows, "Deleted host");
        Ok(())
    }

    async fn delete_all_hosts(&self) -> Result<()> {
        let rows = self
            .execute_mutation(MutationStatement::DeleteAll, Vec::new())
            .await?;
        tracing::debug!(rows, "Deleted all hosts");
        Ok(())
    }

    async fn update_last_connected(&self, id: i64, timestamp: i64) -> Result<()> {
        let rows = self
            .execute_mutation(
                MutationStatement::SetLastConnected,
                vec![Value::Integer(id), Value::Integer(timestamp)],
            )
            .await?;
        tracing::debug!(id, timestamp, rows, "Updated last connected");
        Ok(())
    }

    async fn update_sort_order(&self, id: i64, order: i32) -> Result<()> {
        let rows = self
            .execute_mutation(
                MutationStatement::SetSortOrder,
                vec![Value::Integer(id), Value::Integer(i64::from(order))],
            )
            .await?;
        tracing::debug!(id, order, rows, "Updated sort order");
        Ok(())
    }
}
