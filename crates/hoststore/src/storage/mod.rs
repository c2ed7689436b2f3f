//! Storage backend implementations.
//!
//! - [`sqlite`]: the persistent [`HostRepository`] backed by SQLite.
//! - [`observed`]: a decorator that announces committed writes and hands out
//!   live query subscriptions.
//!
//! [`HostRepository`]: hoststore_core::storage::HostRepository

pub mod observed;
pub mod sqlite;

pub use observed::{HostStore, ObservedHostRepository};
pub use sqlite::SqliteHostRepository;
