use thiserror::Error;

/// A persisted value could not be decoded into the typed model.
///
/// Mapping errors are fatal to the row being decoded; the store never
/// substitutes a default for an unreadable value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Unknown auth method literal: {0:?}")]
    UnknownAuthMethod(String),
    #[error("Missing column: {column}")]
    MissingColumn { column: &'static str },
    #[error("Column {column} has unexpected type (expected {expected})")]
    UnexpectedType {
        column: &'static str,
        expected: &'static str,
    },
    #[error("Column {column} value {value} is out of range")]
    OutOfRange { column: &'static str, value: i64 },
}

/// Errors that can occur during repository operations.
///
/// Absence is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_unknown_auth_method_display() {
        let error = MappingError::UnknownAuthMethod("CERT".to_string());
        assert_eq!(error.to_string(), "Unknown auth method literal: \"CERT\"");
    }

    #[test]
    fn test_mapping_error_out_of_range_display() {
        let error = MappingError::OutOfRange {
            column: "port",
            value: 1 << 40,
        };
        assert_eq!(
            error.to_string(),
            "Column port value 1099511627776 is out of range"
        );
    }

    #[test]
    fn test_repository_error_storage_display() {
        let error = RepositoryError::Storage("disk I/O error".to_string());
        assert_eq!(error.to_string(), "Storage failure: disk I/O error");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("unable to open file".to_string());
        assert_eq!(error.to_string(), "Connection failed: unable to open file");
    }

    #[test]
    fn test_repository_error_from_mapping_error() {
        let error: RepositoryError = MappingError::MissingColumn { column: "name" }.into();
        assert_eq!(error.to_string(), "Mapping error: Missing column: name");
    }
}
