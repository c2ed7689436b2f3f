//! hoststore CLI entry point.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hoststore::cli::{Cli, Commands, OutputFormat};
use hoststore::output::{format_output, pretty};
use hoststore::{Config, HostStore};
use hoststore_core::host::{now_millis, HostRecord};
use hoststore_core::storage::HostRepository;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoststore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().with_database_path(cli.database.clone());
    let store = HostStore::open(&config).await?;

    match cli.command {
        Commands::List => {
            let hosts = store.get_all_hosts().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&hosts, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_hosts(&hosts)),
            }
        }
        Commands::Get { id } => {
            let host = require_host(&store, id).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&host, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_host(&host)),
            }
        }
        Commands::Add {
            name,
            address,
            username,
            port,
            auth,
            password,
            key_path,
            passphrase,
            initial_directory,
            sort_order,
        } => {
            let sort_order = match sort_order {
                Some(order) => order,
                None => store.next_sort_order().await?,
            };
            let mut host = HostRecord::new(name, address, username)
                .with_port(port)
                .with_sort_order(sort_order);
            host.auth_method = auth.into();
            host.encrypted_password = password.unwrap_or_default();
            host.private_key_path = key_path.unwrap_or_default();
            host.encrypted_passphrase = passphrase.unwrap_or_default();
            if initial_directory.is_some() {
                host.initial_directory = initial_directory;
            }

            let id = store.insert_host(&host).await?;
            let host = host.with_id(id);
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&host, cli.format)),
                OutputFormat::Pretty => println!("Created:\n{}", pretty::format_host(&host)),
            }
        }
        Commands::Update {
            id,
            name,
            address,
            username,
            port,
            auth,
            password,
            key_path,
            passphrase,
            initial_directory,
        } => {
            let mut host = require_host(&store, id).await?;
            if let Some(name) = name {
                host.name = name;
            }
            if let Some(address) = address {
                host.address = address;
            }
            if let Some(username) = username {
                host.username = username;
            }
            if let Some(port) = port {
                host.port = port;
            }
            if let Some(auth) = auth {
                host.auth_method = auth.into();
            }
            if let Some(password) = password {
                host.encrypted_password = password;
            }
            if let Some(key_path) = key_path {
                host.private_key_path = key_path;
            }
            if let Some(passphrase) = passphrase {
                host.encrypted_passphrase = passphrase;
            }
            if initial_directory.is_some() {
                host.initial_directory = initial_directory;
            }

            store.update_host(&host).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&host, cli.format)),
                OutputFormat::Pretty => println!("Updated:\n{}", pretty::format_host(&host)),
            }
        }
        Commands::Remove { id } => {
            store.delete_host_by_id(id).await?;
            if !cli.quiet {
                println!("Removed host {}", id);
            }
        }
        Commands::Clear => {
            let count = store.count_hosts().await?;
            store.delete_all_hosts().await?;
            if !cli.quiet {
                println!("Removed {} hosts", count);
            }
        }
        Commands::Touch { id, at } => {
            let timestamp = at.unwrap_or_else(now_millis);
            store.update_last_connected(id, timestamp).await?;
            if !cli.quiet {
                println!("Recorded connection to host {}", id);
            }
        }
        Commands::Reorder { id, order } => {
            store.update_sort_order(id, order).await?;
            if !cli.quiet {
                println!("Moved host {} to position {}", id, order);
            }
        }
        Commands::Watch { interval_ms } => {
            watch(&store, cli.format, cli.quiet, interval_ms).await?;
        }
    }

    Ok(())
}

async fn require_host(store: &HostStore, id: i64) -> Result<HostRecord> {
    match store.get_host(id).await? {
        Some(host) => Ok(host),
        None => bail!("Host {} not found", id),
    }
}

/// Prints every distinct snapshot until Ctrl+C.
async fn watch(
    store: &HostStore,
    format: OutputFormat,
    quiet: bool,
    interval_ms: u64,
) -> Result<()> {
    let subscription = store.subscribe_all().await?;
    let handle = subscription.handle();
    let stream = subscription.into_stream();
    tokio::pin!(stream);

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    let mut version = store.data_version().await?;

    if !quiet {
        eprintln!("Watching hosts, press Ctrl+C to stop...");
    }

    loop {
        tokio::select! {
            snapshot = stream.next() => match snapshot {
                Some(hosts) => match format {
                    OutputFormat::Json => println!("{}", format_output(&hosts, format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_hosts(&hosts)),
                },
                None => break,
            },
            _ = ticker.tick() => {
                let current = store.data_version().await?;
                if current != version {
                    version = current;
                    store.announce_external_change().await;
                }
            }
            _ = signal::ctrl_c() => {
                tracing::debug!("Received Ctrl+C, stopping watch");
                handle.cancel();
                break;
            }
        }
    }

    Ok(())
}
