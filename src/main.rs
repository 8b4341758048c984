//! Wallet service daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!     wallet-cli / HTTP client
//!              │
//!              ▼
//!     ┌─────────────────┐    ┌──────────────────┐    ┌───────────────────┐
//!     │ http (axum API) │───▶│  WalletManager   │───▶│ EncryptedWallet-  │──▶ storage
//!     │ auth, envelope  │    │  lock state,     │    │ Store (PBKDF2 +   │   (file/memory)
//!     └─────────────────┘    │  account facade  │    │ AES-GCM)          │
//!                            └────────┬─────────┘    └───────────────────┘
//!                                     │
//!                                     ▼
//!                            ┌──────────────────┐
//!                            │ blockchain       │───▶ JSON-RPC nodes
//!                            │ accounts, nonces │     (with failover)
//!                            └──────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use wallet_manager::config::load_or_default;
use wallet_manager::lifecycle::{signals, startup, Shutdown};
use wallet_manager::observability;
use wallet_manager::HttpServer;

#[derive(Parser)]
#[command(name = "wallet-manager")]
#[command(about = "Background wallet service for a multi-chain wallet", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "WALLET_MANAGER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    observability::logging::init(&config.observability);
    tracing::info!("wallet-manager v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.api.bind_address,
        storage = ?config.storage.backend,
        blockchains = config.blockchains.len(),
        default_blockchain = %config.wallet.default_blockchain,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let manager = startup::bootstrap(&config)?;
    startup::probe_blockchains(manager.registry()).await;

    let listener = TcpListener::bind(&config.api.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(&config.api, manager.clone());
    server.run(listener, shutdown.wait()).await?;

    if let Err(e) = manager.shutdown().await {
        tracing::error!(code = %e.code, error = %e.message, "Failed to lock wallet on shutdown");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
