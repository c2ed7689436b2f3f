//! hoststore - reactive SQLite store for SSH connection profiles.
//!
//! [`HostStore`] persists [`HostRecord`]s, runs every mutation in its own
//! transaction, and keeps [`HostSubscription`]s up to date with the ordered
//! host list.
//!
//! [`HostRecord`]: hoststore_core::host::HostRecord

pub mod cli;
pub mod config;
pub mod notify;
pub mod output;
pub mod storage;
pub mod subscription;

pub use config::Config;
pub use storage::{HostStore, ObservedHostRepository, SqliteHostRepository};
pub use subscription::{HostSubscription, SubscriptionHandle, SubscriptionState};
