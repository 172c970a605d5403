//! WASM VM node service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                  WASM VM SERVICE                      │
//!                 │                                                       │
//!   JSON-RPC      │  ┌────────┐    ┌─────────┐    ┌──────────────────┐   │
//!   ──────────────┼─▶│  http  │───▶│ service │───▶│ args (coercion)  │   │
//!                 │  │  rpc   │    │ builder │    └──────────────────┘   │
//!                 │  └────────┘    └────┬────┘                           │
//!                 │                     │ sign (chain::tx, chain::keys)  │
//!                 │                     ▼                                │
//!                 │              ┌─────────────┐  notify  ┌──────────┐   │
//!                 │              │ PendingPool │─────────▶│  block   │   │
//!                 │              └─────────────┘          │ producer │   │
//!                 │                                       └────┬─────┘   │
//!                 │                                            ▼         │
//!   getTx         │                                     ┌────────────┐   │
//!   ──────────────┼────────────────────────────────────▶│  TxStore   │   │
//!                 │                                     └────────────┘   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use wasmvm_service::chain::{
    BlockProducer, ChannelNotifier, MemoryTxStore, PendingPool, Secp256k1KeyFactory,
    SignedTxFactory,
};
use wasmvm_service::config::{load_config, NodeConfig};
use wasmvm_service::lifecycle::{wait_for_shutdown_signal, Shutdown};
use wasmvm_service::observability::{logging, metrics};
use wasmvm_service::{HttpServer, Service};

#[derive(Parser)]
#[command(name = "wasmvm-service")]
#[command(about = "JSON-RPC service for deploying and invoking wasm contracts", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NodeConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("wasmvm-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.rpc.endpoint,
        chain_id = config.chain.chain_id,
        max_block_txs = config.chain.max_block_txs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(match &config.store.persistence_path {
        Some(path) => MemoryTxStore::load_from_file(path)?,
        None => MemoryTxStore::new(None),
    });
    let pool = PendingPool::new();
    let (notifier, ready) = ChannelNotifier::channel(config.chain.notify_buffer);

    let service = Service::new(
        Arc::new(Secp256k1KeyFactory),
        Arc::new(SignedTxFactory::new(config.chain.chain_id)),
        pool.clone(),
        Arc::new(notifier),
        store.clone(),
    );

    let shutdown = Shutdown::new();
    let producer = BlockProducer::new(pool, store, ready, config.chain.max_block_txs);
    let producer_task = tokio::spawn(producer.run(shutdown.subscribe()));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        signal_shutdown.trigger();
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, service);
    let served = server.run(listener, shutdown.subscribe()).await;

    // The server can also stop on an I/O error; make sure the producer seals
    // the pool and flushes either way.
    shutdown.trigger();
    if let Err(e) = producer_task.await {
        tracing::error!(error = %e, "Block producer task failed");
    }
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}
