//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and [`HostRecord`].
//! These are testable in isolation without database access. Every column is
//! decoded strictly: a value of the wrong type, an integer that does not fit
//! the target field, or an unknown auth-method literal is a [`MappingError`].

use hoststore_core::host::{AuthMethod, HostRecord};
use hoststore_core::storage::MappingError;
use rusqlite::types::{Type, Value};
use rusqlite::Row;

use super::schema::HOST_COLUMNS;

/// Ordered column values of one `hosts` row, in [`HOST_COLUMNS`] order.
pub type HostRow = [Value; 13];

const ID: usize = 0;
const NAME: usize = 1;
const ADDRESS: usize = 2;
const PORT: usize = 3;
const USERNAME: usize = 4;
const AUTH_METHOD: usize = 5;
const ENCRYPTED_PASSWORD: usize = 6;
const PRIVATE_KEY_PATH: usize = 7;
const ENCRYPTED_PASSPHRASE: usize = 8;
const INITIAL_DIRECTORY: usize = 9;
const CREATED_AT: usize = 10;
const LAST_CONNECTED_AT: usize = 11;
const SORT_ORDER: usize = 12;

// ============================================================================
// Record -> row
// ============================================================================

/// Convert a HostRecord to its ordered column values.
pub fn host_to_row(host: &HostRecord) -> HostRow {
    [
        Value::Integer(host.id),
        Value::Text(host.name.clone()),
        Value::Text(host.address.clone()),
        Value::Integer(i64::from(host.port)),
        Value::Text(host.username.clone()),
        Value::Text(host.auth_method.as_str().to_string()),
        Value::Text(host.encrypted_password.clone()),
        Value::Text(host.private_key_path.clone()),
        Value::Text(host.encrypted_passphrase.clone()),
        host.initial_directory.clone().map_or(Value::Null, Value::Text),
        Value::Integer(host.created_at),
        Value::Integer(host.last_connected_at),
        Value::Integer(i64::from(host.sort_order)),
    ]
}

/// Column values bound by the upsert statement.
///
/// Identical to [`host_to_row`] except that an unassigned id (0) is bound as
/// NULL so SQLite allocates a fresh one.
pub fn host_to_insert_row(host: &HostRecord) -> HostRow {
    let mut row = host_to_row(host);
    if !host.is_persisted() {
        row[ID] = Value::Null;
    }
    row
}

// ============================================================================
// Row -> record
// ============================================================================

/// Convert ordered column values to a HostRecord.
///
/// Fails on the first column that cannot be decoded; no partially populated
/// record is ever produced.
pub fn host_from_row(values: &[Value]) -> Result<HostRecord, MappingError> {
    Ok(HostRecord {
        id: integer(values, ID)?,
        name: text(values, NAME)?,
        address: text(values, ADDRESS)?,
        port: int32(values, PORT)?,
        username: text(values, USERNAME)?,
        auth_method: parse_auth_method(values)?,
        encrypted_password: text(values, ENCRYPTED_PASSWORD)?,
        private_key_path: text(values, PRIVATE_KEY_PATH)?,
        encrypted_passphrase: text(values, ENCRYPTED_PASSPHRASE)?,
        initial_directory: optional_text(values, INITIAL_DIRECTORY)?,
        created_at: integer(values, CREATED_AT)?,
        last_connected_at: integer(values, LAST_CONNECTED_AT)?,
        sort_order: int32(values, SORT_ORDER)?,
    })
}

/// Convert a SQLite row to a HostRecord.
///
/// Expected columns: see [`HOST_COLUMNS`]. Mapping failures are wrapped in
/// `rusqlite::Error::FromSqlConversionFailure` so they can cross the
/// `rusqlite` API; the error mapper unwraps them again.
pub fn row_to_host(row: &Row) -> rusqlite::Result<HostRecord> {
    let mut values = Vec::with_capacity(HOST_COLUMNS.len());
    for idx in 0..HOST_COLUMNS.len() {
        match row.get::<_, Value>(idx) {
            Ok(value) => values.push(value),
            // Missing trailing columns are reported by host_from_row.
            Err(rusqlite::Error::InvalidColumnIndex(_)) => break,
            Err(e) => return Err(e),
        }
    }

    host_from_row(&values).map_err(mapping_failure)
}

/// Wraps a MappingError for transport through rusqlite.
pub fn mapping_failure(err: MappingError) -> rusqlite::Error {
    let idx = match &err {
        MappingError::UnknownAuthMethod(_) => AUTH_METHOD,
        MappingError::MissingColumn { column }
        | MappingError::UnexpectedType { column, .. }
        | MappingError::OutOfRange { column, .. } => column_index(column),
    };
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

// ============================================================================
// Helper functions
// ============================================================================

fn column_index(column: &str) -> usize {
    HOST_COLUMNS
        .iter()
        .position(|c| *c == column)
        .unwrap_or_default()
}

fn column(values: &[Value], idx: usize) -> Result<&Value, MappingError> {
    values.get(idx).ok_or(MappingError::MissingColumn {
        column: HOST_COLUMNS[idx],
    })
}

fn integer(values: &[Value], idx: usize) -> Result<i64, MappingError> {
    match column(values, idx)? {
        Value::Integer(i) => Ok(*i),
        _ => Err(MappingError::UnexpectedType {
            column: HOST_COLUMNS[idx],
            expected: "INTEGER",
        }),
    }
}

fn int32(values: &[Value], idx: usize) -> Result<i32, MappingError> {
    let value = integer(values, idx)?;
    i32::try_from(value).map_err(|_| MappingError::OutOfRange {
        column: HOST_COLUMNS[idx],
        value,
    })
}

fn text(values: &[Value], idx: usize) -> Result<String, MappingError> {
    match column(values, idx)? {
        Value::Text(s) => Ok(s.clone()),
        _ => Err(MappingError::UnexpectedType {
            column: HOST_COLUMNS[idx],
            expected: "TEXT",
        }),
    }
}

fn optional_text(values: &[Value], idx: usize) -> Result<Option<String>, MappingError> {
    match column(values, idx)? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s.clone())),
        _ => Err(MappingError::UnexpectedType {
            column: HOST_COLUMNS[idx],
            expected: "TEXT or NULL",
        }),
    }
}

fn parse_auth_method(values: &[Value]) -> Result<AuthMethod, MappingError> {
    text(values, AUTH_METHOD)?.parse()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample_host() -> HostRecord {
        HostRecord {
            id: 42,
            name: "bastion".to_string(),
            address: "203.0.113.7".to_string(),
            port: 2222,
            username: "ops".to_string(),
            auth_method: AuthMethod::Key,
            encrypted_password: String::new(),
            private_key_path: "/keys/ops_ed25519".to_string(),
            encrypted_passphrase: "aGVsbG8=".to_string(),
            initial_directory: Some("/srv".to_string()),
            created_at: 1_700_000_000_000,
            last_connected_at: 1_700_000_500_000,
            sort_order: 3,
        }
    }

    #[test]
    fn test_round_trip() {
        let host = sample_host();
        assert_eq!(host_from_row(&host_to_row(&host)), Ok(host));
    }

    #[test]
    fn test_round_trip_without_initial_directory() {
        let host = sample_host().with_initial_directory(None);
        let row = host_to_row(&host);

        assert_eq!(row[INITIAL_DIRECTORY], Value::Null);
        assert_eq!(host_from_row(&row), Ok(host));
    }

    #[test]
    fn test_round_trip_extreme_numbers() {
        let mut host = sample_host();
        host.id = i64::MAX;
        host.created_at = i64::MIN;
        host.last_connected_at = i64::MAX;
        host.port = i32::MAX;
        host.sort_order = i32::MIN;

        assert_eq!(host_from_row(&host_to_row(&host)), Ok(host));
    }

    #[test]
    fn test_row_follows_column_order() {
        let row = host_to_row(&sample_host());

        assert_eq!(row.len(), HOST_COLUMNS.len());
        assert_eq!(row[ID], Value::Integer(42));
        assert_eq!(row[AUTH_METHOD], Value::Text("KEY".to_string()));
        assert_eq!(row[SORT_ORDER], Value::Integer(3));
    }

    #[test]
    fn test_insert_row_nulls_unassigned_id() {
        let host = sample_host().with_id(0);
        assert_eq!(host_to_insert_row(&host)[ID], Value::Null);

        let host = sample_host();
        assert_eq!(host_to_insert_row(&host)[ID], Value::Integer(42));
    }

    #[test]
    fn test_unknown_auth_method_is_mapping_error() {
        let mut row = host_to_row(&sample_host());
        row[AUTH_METHOD] = Value::Text("TOTP".to_string());

        assert_eq!(
            host_from_row(&row),
            Err(MappingError::UnknownAuthMethod("TOTP".to_string()))
        );
    }

    #[test]
    fn test_missing_column_is_mapping_error() {
        let row = host_to_row(&sample_host());

        assert_eq!(
            host_from_row(&row[..12]),
            Err(MappingError::MissingColumn {
                column: "sort_order"
            })
        );
    }

    #[test]
    fn test_port_out_of_range_is_mapping_error() {
        let mut row = host_to_row(&sample_host());
        row[PORT] = Value::Integer(i64::from(i32::MAX) + 1);

        assert_eq!(
            host_from_row(&row),
            Err(MappingError::OutOfRange {
                column: "port",
                value: i64::from(i32::MAX) + 1,
            })
        );
    }

    #[test]
    fn test_wrong_type_is_mapping_error() {
        let mut row = host_to_row(&sample_host());
        row[NAME] = Value::Integer(7);

        assert_eq!(
            host_from_row(&row),
            Err(MappingError::UnexpectedType {
                column: "name",
                expected: "TEXT",
            })
        );
    }

    #[test]
    fn test_mapping_failure_preserves_source() {
        let err = mapping_failure(MappingError::UnknownAuthMethod("X".to_string()));

        match err {
            rusqlite::Error::FromSqlConversionFailure(idx, _, source) => {
                assert_eq!(idx, AUTH_METHOD);
                assert!(source.downcast_ref::<MappingError>().is_some());
            }
            other => panic!("Expected FromSqlConversionFailure, got {other:?}"),
        }
    }

    fn auth_method() -> impl Strategy<Value = AuthMethod> {
        prop_oneof![Just(AuthMethod::Password), Just(AuthMethod::Key)]
    }

    prop_compose! {
        fn host_record()(
            id in any::<i64>(),
            name in ".*",
            address in ".*",
            port in any::<i32>(),
            username in ".*",
            auth_method in auth_method(),
            encrypted_password in ".*",
            private_key_path in ".*",
            encrypted_passphrase in ".*",
            initial_directory in proptest::option::of(".*"),
            created_at in any::<i64>(),
            last_connected_at in any::<i64>(),
            sort_order in any::<i32>(),
        ) -> HostRecord {
            HostRecord {
                id,
                name,
                address,
                port,
                username,
                auth_method,
                encrypted_password,
                private_key_path,
                encrypted_passphrase,
                initial_directory,
                created_at,
                last_connected_at,
                sort_order,
            }
        }
    }

    proptest! {
        /// Any record survives record -> row -> record unchanged, and its
        /// auth method is stored as the upper-case literal.
        #[test]
        fn proptest_row_round_trip(host in host_record()) {
            let row = host_to_row(&host);

            prop_assert_eq!(
                &row[AUTH_METHOD],
                &Value::Text(host.auth_method.as_str().to_string())
            );
            prop_assert_eq!(host_from_row(&row), Ok(host));
        }
    }
}
