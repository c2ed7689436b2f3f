//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};

use hoststore_core::host::{AuthMethod, DEFAULT_SSH_PORT};

use crate::config::Config;

/// Manage stored SSH connection profiles.
#[derive(Debug, Parser)]
#[command(name = "hoststore")]
#[command(version, about = "Manage stored SSH connection profiles", long_about = None)]
pub struct Cli {
    /// SQLite database path (`:memory:` for a throwaway store).
    #[arg(long, env = "HOSTSTORE_DB_PATH", default_value = Config::DEFAULT_DATABASE_PATH)]
    pub database: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// CLI authentication method (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AuthArg {
    Password,
    Key,
}

impl From<AuthArg> for AuthMethod {
    fn from(arg: AuthArg) -> Self {
        match arg {
            AuthArg::Password => AuthMethod::Password,
            AuthArg::Key => AuthMethod::Key,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List hosts in display order.
    List,
    /// Get a host by ID.
    Get {
        /// Host ID.
        id: i64,
    },
    /// Add a new host.
    Add {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Hostname or IP address.
        #[arg(long)]
        address: String,
        /// Login user.
        #[arg(long)]
        username: String,
        /// SSH port.
        #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
        port: i32,
        /// Authentication method.
        #[arg(long, value_enum, default_value = "password")]
        auth: AuthArg,
        /// Pre-encrypted password, stored verbatim.
        #[arg(long)]
        password: Option<String>,
        /// Private key path for key authentication.
        #[arg(long)]
        key_path: Option<String>,
        /// Pre-encrypted key passphrase, stored verbatim.
        #[arg(long)]
        passphrase: Option<String>,
        /// Directory to start in (default: /home/<username>).
        #[arg(long)]
        initial_directory: Option<String>,
        /// Display position (default: after every existing host).
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Replace fields of an existing host.
    Update {
        /// Host ID.
        id: i64,
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New hostname or IP address.
        #[arg(long)]
        address: Option<String>,
        /// New login user.
        #[arg(long)]
        username: Option<String>,
        /// New SSH port.
        #[arg(long)]
        port: Option<i32>,
        /// New authentication method.
        #[arg(long, value_enum)]
        auth: Option<AuthArg>,
        /// New pre-encrypted password.
        #[arg(long)]
        password: Option<String>,
        /// New private key path.
        #[arg(long)]
        key_path: Option<String>,
        /// New pre-encrypted key passphrase.
        #[arg(long)]
        passphrase: Option<String>,
        /// New initial directory.
        #[arg(long)]
        initial_directory: Option<String>,
    },
    /// Remove a host by ID.
    Remove {
        /// Host ID.
        id: i64,
    },
    /// Remove every host.
    Clear,
    /// Record a connection to a host.
    Touch {
        /// Host ID.
        id: i64,
        /// Connection time in epoch milliseconds (default: now).
        #[arg(long)]
        at: Option<i64>,
    },
    /// Move a host to a new display position.
    Reorder {
        /// Host ID.
        id: i64,
        /// New sort order.
        order: i32,
    },
    /// Print the host list every time it changes.
    Watch {
        /// How often to check for commits from other processes, in milliseconds.
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}
