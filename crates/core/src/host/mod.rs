mod types;

pub use types::{now_millis, AuthMethod, HostRecord, DEFAULT_SSH_PORT};
