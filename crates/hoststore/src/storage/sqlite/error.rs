//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError` from
//! `hoststore_core::storage`. Row decoding failures come back as
//! `RepositoryError::Mapping`; everything else the engine reports collapses
//! into `RepositoryError::Storage`.

use hoststore_core::storage::{MappingError, RepositoryError};

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `FromSqlConversionFailure` carrying a `MappingError` → `RepositoryError::Mapping`
/// - Invalid column index or name → `MappingError::MissingColumn`
/// - Invalid column type → `MappingError::UnexpectedType`
/// - Connection errors → `RepositoryError::ConnectionFailed`
/// - All other errors (I/O, constraints, disk full) → `RepositoryError::Storage`
pub fn map_rusqlite_error(err: &rusqlite::Error) -> RepositoryError {
    match err {
        rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
            match source.downcast_ref::<MappingError>() {
                Some(mapping) => RepositoryError::Mapping(mapping.clone()),
                None => RepositoryError::Storage(err.to_string()),
            }
        }

        rusqlite::Error::InvalidColumnIndex(_) | rusqlite::Error::InvalidColumnName(_) => {
            RepositoryError::Mapping(MappingError::MissingColumn { column: "unknown" })
        }

        rusqlite::Error::InvalidColumnType(_, _, _)
        | rusqlite::Error::IntegralValueOutOfRange(_, _) => {
            RepositoryError::Mapping(MappingError::UnexpectedType {
                column: "unknown",
                expected: "declared column type",
            })
        }

        // Connection-related errors
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        // All other errors
        _ => RepositoryError::Storage(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// This is the main entry point for error mapping in async code.
/// It extracts the inner `rusqlite::Error` if present, otherwise
/// maps to a generic `Storage` error.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed".to_string())
        }
        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::Storage(err.to_string()),
    }
}

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
pub fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}
