//! strixd — the strix daemon.
//!
//! Single binary that assembles the orchestration core:
//! - Mission runtime + worker task
//! - Scheduler with the boot self-test
//! - Peer directory (verification, sweep, probing, mDNS discovery)
//! - Cluster coordinator
//!
//! # Usage
//!
//! ```text
//! strixd run --config /etc/strix/strix.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};

use strix_core::{DeviceConfig, NullHal};
use strix_peers::{HttpStatusClient, MdnsDiscovery};
use strixd::Node;

#[derive(Parser)]
#[command(name = "strixd", about = "Strix device daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the orchestration core.
    Run {
        /// Path to the device configuration.
        #[arg(long, default_value = "strix.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,strixd=debug,strix=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { config } => run(config).await,
    }
}

async fn run(config_path: PathBuf) -> anyhow::Result<()> {
    info!("strix daemon starting");

    let config = if config_path.exists() {
        DeviceConfig::from_file(&config_path)?
    } else {
        warn!(path = ?config_path, "no config file, using defaults");
        DeviceConfig::default()
    };

    // The real radio/LED drivers live outside this core; the driverless
    // HAL stands in until one is linked.
    let hal = Arc::new(NullHal::new());

    let client = Arc::new(HttpStatusClient::new(
        config.port,
        config.status_path.clone(),
        Duration::from_millis(config.peers.probe_timeout_ms),
    ));

    let discovery = Arc::new(MdnsDiscovery::new()?);
    if let Err(e) = discovery.register(&config.hostname, config.port, &config.cluster) {
        warn!(error = %e, "mdns registration failed, discovery is receive-only");
    }

    let node = Node::new(config, hal, client, discovery);
    node.boot().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner = tokio::spawn(async move { node.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    runner.await?;

    info!("strix daemon stopped");
    Ok(())
}
