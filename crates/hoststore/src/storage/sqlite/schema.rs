//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// Version stored in `PRAGMA user_version`. Bump on any column change.
pub const SCHEMA_VERSION: i64 = 1;

/// Column names in mapping order. The row mapper relies on this order.
pub const HOST_COLUMNS: [&str; 13] = [
    "id",
    "name",
    "address",
    "port",
    "username",
    "auth_method",
    "encrypted_password",
    "private_key_path",
    "encrypted_passphrase",
    "initial_directory",
    "created_at",
    "last_connected_at",
    "sort_order",
];

/// SQL statement to create the hosts table.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS hosts (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    port INTEGER NOT NULL,
    username TEXT NOT NULL,
    auth_method TEXT NOT NULL,
    encrypted_password TEXT NOT NULL,
    private_key_path TEXT NOT NULL,
    encrypted_passphrase TEXT NOT NULL,
    initial_directory TEXT,
    created_at INTEGER NOT NULL,
    last_connected_at INTEGER NOT NULL,
    sort_order INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_hosts_sort_order_name ON hosts(sort_order, name);
"#;

/// Drops everything `CREATE_TABLES` creates.
pub const DROP_TABLES: &str = r#"
DROP INDEX IF EXISTS idx_hosts_sort_order_name;
DROP TABLE IF EXISTS hosts;
"#;

// Host queries
pub const SELECT_HOST_BY_ID: &str = r#"
SELECT id, name, address, port, username, auth_method, encrypted_password, private_key_path,
       encrypted_passphrase, initial_directory, created_at, last_connected_at, sort_order
FROM hosts
WHERE id = ?1
"#;

pub const SELECT_ALL_HOSTS: &str = r#"
SELECT id, name, address, port, username, auth_method, encrypted_password, private_key_path,
       encrypted_passphrase, initial_directory, created_at, last_connected_at, sort_order
FROM hosts
ORDER BY sort_order ASC, name ASC
"#;

pub const COUNT_HOSTS: &str = r#"
SELECT COUNT(*) FROM hosts
"#;

/// Upsert keyed by id. A NULL id asks SQLite to assign one.
pub const UPSERT_HOST: &str = r#"
INSERT OR REPLACE INTO hosts (id, name, address, port, username, auth_method, encrypted_password,
                              private_key_path, encrypted_passphrase, initial_directory,
                              created_at, last_connected_at, sort_order)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

pub const UPDATE_HOST: &str = r#"
UPDATE hosts
SET name = ?2, address = ?3, port = ?4, username = ?5, auth_method = ?6,
    encrypted_password = ?7, private_key_path = ?8, encrypted_passphrase = ?9,
    initial_directory = ?10, created_at = ?11, last_connected_at = ?12, sort_order = ?13
WHERE id = ?1
"#;

pub const DELETE_HOST_BY_ID: &str = r#"
DELETE FROM hosts
WHERE id = ?1
"#;

pub const DELETE_ALL_HOSTS: &str = r#"
DELETE FROM hosts
"#;

pub const UPDATE_LAST_CONNECTED: &str = r#"
UPDATE hosts
SET last_connected_at = ?2
WHERE id = ?1
"#;

pub const UPDATE_SORT_ORDER: &str = r#"
UPDATE hosts
SET sort_order = ?2
WHERE id = ?1
"#;
