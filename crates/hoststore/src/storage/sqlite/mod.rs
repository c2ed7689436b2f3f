//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of [`HostRepository`]
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping.
//!
//! [`HostRepository`]: hoststore_core::storage::HostRepository

mod conversions;
mod error;
mod repository;
mod schema;
mod statements;

pub use repository::SqliteHostRepository;
