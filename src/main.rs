//! `portfolio-sync` command line.
//!
//! Inspect and edit the section configuration, and watch it converge in
//! real time.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use portfolio_sync::admin::{PanelError, SectionConfigEditor};
use portfolio_sync::config::{default_config, load_config, SyncConfig};
use portfolio_sync::content::Field;
use portfolio_sync::observability::{logging, metrics};
use portfolio_sync::storage::FileStore;
use portfolio_sync::SyncClient;

#[derive(Parser)]
#[command(name = "portfolio-sync")]
#[command(about = "Section config sync client for the portfolio API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the canonical section config
    Show,
    /// Follow config changes until Ctrl-C
    Watch,
    /// Edit one stored field (title, subtitle, description, mainTitle, emoji) and save it
    Set {
        section: String,
        field: String,
        value: String,
    },
    /// Tell every view the config changed
    Touch,
    /// Log in and store the admin token
    Login { username: String, password: String },
    /// Forget the stored admin token
    Logout,
    /// Ask the server to send a test push
    TestPush,
    /// Check that the backend is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: SyncConfig = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    logging::init_logging(&config.observability.log_level);
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let store = Arc::new(FileStore::open(&config.storage.dir)?);
    let client = SyncClient::new(&config, store)?;

    match cli.command {
        Commands::Show => {
            let current = client.refresh().await?;
            print_json(&current.to_value())?;
        }
        Commands::Watch => watch(&client).await?,
        Commands::Set {
            section,
            field,
            value,
        } => {
            if field.contains('.') {
                // Card text is never stored server-side.
                return Err(PanelError::DisplayOnly(format!("{}.{}", section, field)).into());
            }
            let field: Field = field.parse()?;
            client.refresh().await?;
            let mut editor = SectionConfigEditor::new(client.clone());
            editor.set_field(&section, field, value)?;
            let saved = editor.save().await?;
            println!("Saved: {}", saved.join(", "));
        }
        Commands::Touch => {
            let event = client.publish()?;
            println!("Published change at {}", event.timestamp_ms);
        }
        Commands::Login { username, password } => {
            client.api().client().login(&username, &password).await?;
            println!("Logged in as {}", username);
        }
        Commands::Logout => {
            client.api().client().logout();
            println!("Logged out");
        }
        Commands::TestPush => {
            let response = client.trigger_test_push().await?;
            print_json(&response)?;
        }
        Commands::Health => {
            let response = client.api().client().health().await?;
            print_json(&response)?;
        }
    }

    Ok(())
}

async fn watch(client: &SyncClient) -> Result<(), Box<dyn std::error::Error>> {
    client.open().await?;
    let mut changes = client.changes();
    print_json(&client.current().to_value())?;

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                print_json(&client.current().to_value())?;
                if let Some(status) = client.socket_status() {
                    tracing::debug!(state = ?status.state, attempts = status.reconnect_attempts, "Socket status");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, closing");
                break;
            }
        }
    }

    client.close().await;
    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
