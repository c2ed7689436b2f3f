//! Reusable prepared statements for the fixed-text mutations.
//!
//! Statements live in the connection's prepared-statement cache, keyed by SQL
//! text. [`acquire`] checks a statement out of the cache; the returned guard
//! puts it back (with bindings cleared) when dropped, on every exit path. A
//! checked-out statement is invisible to other callers, so two overlapping
//! acquisitions of the same text never share parameter bindings.

use rusqlite::{CachedStatement, Connection, Params};

use super::schema;

/// The cached single-statement mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationStatement {
    DeleteById,
    DeleteAll,
    SetLastConnected,
    SetSortOrder,
}

impl MutationStatement {
    #[cfg(test)]
    pub const ALL: [MutationStatement; 4] = [
        MutationStatement::DeleteById,
        MutationStatement::DeleteAll,
        MutationStatement::SetLastConnected,
        MutationStatement::SetSortOrder,
    ];

    /// SQL text, which doubles as the cache key.
    pub const fn sql(self) -> &'static str {
        match self {
            MutationStatement::DeleteById => schema::DELETE_HOST_BY_ID,
            MutationStatement::DeleteAll => schema::DELETE_ALL_HOSTS,
            MutationStatement::SetLastConnected => schema::UPDATE_LAST_CONNECTED,
            MutationStatement::SetSortOrder => schema::UPDATE_SORT_ORDER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            MutationStatement::DeleteById => "delete_by_id",
            MutationStatement::DeleteAll => "delete_all",
            MutationStatement::SetLastConnected => "set_last_connected",
            MutationStatement::SetSortOrder => "set_sort_order",
        }
    }
}

/// Checks a statement out of the connection cache, preparing it on first use.
pub fn acquire(
    conn: &Connection,
    statement: MutationStatement,
) -> rusqlite::Result<CachedStatement<'_>> {
    conn.prepare_cached(statement.sql())
}

/// Binds `params` to a cached statement and executes it.
///
/// Returns the number of affected rows. The statement is released before
/// this function returns, whether execution succeeded or not.
pub fn execute<P: Params>(
    conn: &Connection,
    statement: MutationStatement,
    params: P,
) -> rusqlite::Result<usize> {
    let rows = {
        let mut stmt = acquire(conn, statement)?;
        stmt.execute(params)
    };
    tracing::trace!(
        statement = statement.name(),
        ok = rows.is_ok(),
        "Released statement"
    );
    rows
}
