use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::MappingError;

/// Port used when a profile does not specify one.
pub const DEFAULT_SSH_PORT: i32 = 22;

/// How the client authenticates against a host.
///
/// Persisted as the literal variant name (`"PASSWORD"` or `"KEY"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    #[default]
    Password,
    Key,
}

impl AuthMethod {
    /// Returns the literal stored in the `auth_method` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthMethod::Password => "PASSWORD",
            AuthMethod::Key => "KEY",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = MappingError;

    /// Exact, case-sensitive match on the stored literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASSWORD" => Ok(AuthMethod::Password),
            "KEY" => Ok(AuthMethod::Key),
            other => Err(MappingError::UnknownAuthMethod(other.to_string())),
        }
    }
}

/// A saved remote-access connection profile.
///
/// `id == 0` means "not yet persisted"; the store assigns a fresh id on insert.
/// The password and passphrase fields hold ciphertext produced elsewhere and
/// are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub port: i32,
    pub username: String,
    pub auth_method: AuthMethod,
    pub encrypted_password: String,
    /// Only meaningful when `auth_method` is [`AuthMethod::Key`].
    pub private_key_path: String,
    pub encrypted_passphrase: String,
    pub initial_directory: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, 0 when never connected.
    pub last_connected_at: i64,
    pub sort_order: i32,
}

impl HostRecord {
    /// Creates an unsaved password-authenticated profile on the default port.
    ///
    /// The initial directory defaults to the user's home directory and
    /// `created_at` is set to the current time.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            id: 0,
            name: name.into(),
            address: address.into(),
            port: DEFAULT_SSH_PORT,
            initial_directory: Some(format!("/home/{username}")),
            username,
            auth_method: AuthMethod::Password,
            encrypted_password: String::new(),
            private_key_path: String::new(),
            encrypted_passphrase: String::new(),
            created_at: now_millis(),
            last_connected_at: 0,
            sort_order: 0,
        }
    }

    /// Sets a specific ID for this host (useful for testing and upserts).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_port(mut self, port: i32) -> Self {
        self.port = port;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Switches to password authentication with the given ciphertext.
    pub fn with_password(mut self, encrypted_password: impl Into<String>) -> Self {
        self.auth_method = AuthMethod::Password;
        self.encrypted_password = encrypted_password.into();
        self
    }

    /// Switches to key authentication.
    pub fn with_key(
        mut self,
        private_key_path: impl Into<String>,
        encrypted_passphrase: impl Into<String>,
    ) -> Self {
        self.auth_method = AuthMethod::Key;
        self.private_key_path = private_key_path.into();
        self.encrypted_passphrase = encrypted_passphrase.into();
        self
    }

    pub fn with_initial_directory(mut self, directory: Option<String>) -> Self {
        self.initial_directory = directory;
        self
    }

    /// Returns true once the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Label shown to users: the name, or `user@address:port` when unnamed.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}@{}:{}", self.username, self.address, self.port)
        } else {
            self.name.clone()
        }
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
