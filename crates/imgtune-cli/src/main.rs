//! Imgtune Control Tool
//!
//! CLI for controlling the imgtune daemon via D-Bus.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imgtune_client::{BusType, DaemonClient};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum CliBusType {
    /// Try session bus first, fall back to system bus
    #[default]
    Auto,
    /// Use session bus (for user services)
    Session,
    /// Use system bus (for system services)
    System,
}

impl From<CliBusType> for BusType {
    fn from(bus: CliBusType) -> Self {
        match bus {
            CliBusType::Auto => BusType::Auto,
            CliBusType::Session => BusType::Session,
            CliBusType::System => BusType::System,
        }
    }
}

#[derive(Parser)]
#[command(name = "imgtunectl")]
#[command(about = "Control tool for the imgtune panel mode daemon")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// D-Bus bus type to use
    #[arg(long, default_value = "auto", value_enum)]
    bus: CliBusType,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available display modes
    List {
        /// Print as JSON for scripting
        #[arg(long)]
        json: bool,
    },
    /// Show the mode the panel is currently in
    Current,
    /// Show the configured default mode
    Default,
    /// Switch the panel to a mode
    Set {
        /// Mode id or name (e.g. 2 or "game")
        mode: String,

        /// Also persist the mode as the startup default
        #[arg(long = "default")]
        make_default: bool,
    },
    /// Daemon control commands
    Daemon {
        #[command(subcommand)]
        action: DaemonCommands,
    },
}

#[derive(Subcommand)]
enum DaemonCommands {
    /// Check if daemon is running
    Status,
    /// Request daemon shutdown
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Connect to daemon
    let client = DaemonClient::connect_with_bus(cli.bus.into())
        .await
        .context("Failed to connect to daemon. Is imgtuned running?")?;

    match cli.command {
        Commands::List { json } => handle_list(json, &client).await,
        Commands::Current => handle_current(&client).await,
        Commands::Default => handle_default(&client).await,
        Commands::Set { mode, make_default } => handle_set(&mode, make_default, &client).await,
        Commands::Daemon { action } => handle_daemon(action, &client).await,
    }
}

async fn handle_list(json: bool, client: &DaemonClient) -> Result<()> {
    let modes = client.list_modes().await?;

    if json {
        let entries: Vec<_> = modes
            .iter()
            .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Available modes:");
        for (id, name) in modes {
            println!("  {}  {}", id, name);
        }
    }

    Ok(())
}

async fn handle_current(client: &DaemonClient) -> Result<()> {
    let (id, name) = client.current_mode().await?;
    println!("Current mode: {} ({})", name, id);
    Ok(())
}

async fn handle_default(client: &DaemonClient) -> Result<()> {
    let (id, name) = client.default_mode().await?;
    println!("Default mode: {} ({})", name, id);
    Ok(())
}

async fn handle_set(mode: &str, make_default: bool, client: &DaemonClient) -> Result<()> {
    let id = resolve_mode(client, mode).await?;

    if !client.set_mode(id, make_default).await? {
        anyhow::bail!("Failed to set mode: {}", mode);
    }

    if make_default {
        println!("Mode set to: {} (persisted as default)", mode);
    } else {
        println!("Mode set to: {}", mode);
    }

    Ok(())
}

/// Resolves a mode argument to an id, accepting either a numeric id or a
/// case-insensitive mode name.
async fn resolve_mode(client: &DaemonClient, mode: &str) -> Result<i32> {
    if let Ok(id) = mode.parse::<i32>() {
        return Ok(id);
    }

    let modes = client.list_modes().await?;
    modes
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(mode))
        .map(|(id, _)| *id)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown mode: {}. Use an id or name from 'imgtunectl list'",
                mode
            )
        })
}

async fn handle_daemon(action: DaemonCommands, client: &DaemonClient) -> Result<()> {
    match action {
        DaemonCommands::Status => {
            let (current_id, current_name) = client.current_mode().await?;
            let (default_id, default_name) = client.default_mode().await?;
            println!("Daemon: running");
            println!("Current mode: {} ({})", current_name, current_id);
            println!("Default mode: {} ({})", default_name, default_id);
        }
        DaemonCommands::Quit => {
            client.quit().await?;
            println!("Shutdown request sent to daemon");
        }
    }

    Ok(())
}
