use serde::{Deserialize, Serialize};

/// Name of the table holding host profiles.
pub const HOSTS_TABLE: &str = "hosts";

/// Kind of mutation that produced a [`TableChanged`] signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
}

/// Signal emitted after a mutation of `table` has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChanged {
    pub table: String,
    pub operation: ChangeOperation,
    /// Number of records the mutation targeted, 0 for whole-table operations.
    pub rows: u64,
}

impl TableChanged {
    pub fn new(table: impl Into<String>, operation: ChangeOperation, rows: u64) -> Self {
        Self {
            table: table.into(),
            operation,
            rows,
        }
    }

    /// Shorthand for a change to the hosts table.
    pub fn hosts(operation: ChangeOperation, rows: u64) -> Self {
        Self::new(HOSTS_TABLE, operation, rows)
    }
}
