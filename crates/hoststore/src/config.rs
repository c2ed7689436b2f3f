use std::env;

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "hoststore.db")
    pub database_path: String,
    /// Prepared statements kept per connection (default: 16)
    pub statement_cache_capacity: usize,
    /// Buffered table-changed signals per table (default: 100)
    pub change_channel_capacity: usize,
}

impl Config {
    pub const DEFAULT_DATABASE_PATH: &'static str = "hoststore.db";
    pub const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 16;
    pub const DEFAULT_CHANGE_CHANNEL_CAPACITY: usize = 100;

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HOSTSTORE_DB_PATH` - SQLite database path (default: "hoststore.db")
    /// - `HOSTSTORE_STATEMENT_CACHE_CAPACITY` - cached statements (default: 16)
    /// - `HOSTSTORE_CHANGE_CHANNEL_CAPACITY` - signal buffer size (default: 100)
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("HOSTSTORE_DB_PATH")
                .unwrap_or_else(|_| Self::DEFAULT_DATABASE_PATH.to_string()),
            statement_cache_capacity: env::var("HOSTSTORE_STATEMENT_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_STATEMENT_CACHE_CAPACITY),
            change_channel_capacity: env::var("HOSTSTORE_CHANGE_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(Self::DEFAULT_CHANGE_CHANNEL_CAPACITY),
        }
    }

    /// Overrides the database path.
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Returns true when the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("HOSTSTORE_DB_PATH");
        env::remove_var("HOSTSTORE_STATEMENT_CACHE_CAPACITY");
        env::remove_var("HOSTSTORE_CHANGE_CHANNEL_CAPACITY");

        let config = Config::from_env();

        assert_eq!(config.database_path, "hoststore.db");
        assert_eq!(config.statement_cache_capacity, 16);
        assert_eq!(config.change_channel_capacity, 100);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_with_database_path() {
        let config = Config {
            database_path: "hoststore.db".to_string(),
            statement_cache_capacity: 16,
            change_channel_capacity: 100,
        }
        .with_database_path(":memory:");

        assert_eq!(config.database_path, ":memory:");
        assert!(config.is_in_memory());
    }
}
