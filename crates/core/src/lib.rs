//! hoststore_core - pure types and traits for the host profile store.
//!
//! Nothing in this crate performs I/O. Storage backends and change notifiers
//! live in the `hoststore` crate and implement the traits defined here.

pub mod host;
pub mod notify;
pub mod storage;
