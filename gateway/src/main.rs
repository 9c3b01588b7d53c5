// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transaction Gateway
//!
//! Entry point for the `nova-gateway` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the JSON-RPC API over an
//! in-memory ledger and pending pool.
//!
//! The binary supports four subcommands:
//!
//! - `run`     serve the gateway and produce local blocks
//! - `decode`  decode a raw transaction offline
//! - `keygen`  generate a keypair and print its addresses
//! - `version` print build version information

mod api;
mod cli;
mod defaults;
mod error;
mod logging;
mod metrics;
mod projection;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;

use nova_tx::crypto::NovaKeypair;
use nova_tx::state::{FeeParams, MemoryLedger, MemoryPool, PoolConfig};
use nova_tx::transaction::Amount;

use cli::{Commands, NovaGatewayCli};
use logging::LogFormat;
use metrics::{GatewayMetrics, SharedMetrics};
use service::TransactionService;

/// Upper bound on transactions drained into one locally produced block.
const MAX_TXS_PER_BLOCK: usize = 5_000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = NovaGatewayCli::parse();

    match cli.command {
        Commands::Run(args) => run_gateway(args).await,
        Commands::Decode(args) => decode(args),
        Commands::Keygen => keygen(),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the gateway: API server, metrics endpoint, block loop and the
/// pool announcement relay.
async fn run_gateway(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        logging::SERVE_FILTER,
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        block_time_ms = args.block_time_ms,
        "starting nova-gateway"
    );

    // --- Node state ---
    let ledger = Arc::new(MemoryLedger::new());
    let pool = Arc::new(MemoryPool::new(PoolConfig {
        max_size: args.pool_size,
        min_fee: Amount::new(args.pool_min_fee),
    }));
    let fees = Arc::new(FeeParams {
        fee_fraction_ppm: args.fee_fraction_ppm,
        min_fee: Amount::new(args.min_fee),
        max_fee: Amount::new(args.max_fee),
    });
    if fees.min_fee > fees.max_fee {
        tracing::warn!(
            min_fee = args.min_fee,
            max_fee = args.max_fee,
            "min fee exceeds max fee; computed fees will equal the min fee"
        );
    }

    let service = Arc::new(TransactionService::new(
        ledger.clone(),
        pool.clone(),
        fees,
        ledger.clone(),
    ));

    // --- Metrics ---
    let gateway_metrics =
        Arc::new(GatewayMetrics::new().context("failed to register prometheus metrics")?);

    // --- API server ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            nova_tx::config::PROTOCOL_VERSION,
        ),
        service,
        metrics: Arc::clone(&gateway_metrics),
    };
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind RPC listener on {}", api_addr))?;
    tracing::info!("RPC/API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&gateway_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Background tasks ---
    let relay = tokio::spawn(relay_announcements(
        pool.subscribe(),
        Arc::clone(&pool),
        Arc::clone(&gateway_metrics),
    ));
    let block_loop = tokio::spawn(produce_blocks(
        Arc::clone(&ledger),
        Arc::clone(&pool),
        Arc::clone(&gateway_metrics),
        Duration::from_millis(args.block_time_ms.max(1)),
    ));

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    block_loop.abort();
    relay.abort();
    tracing::info!(
        committed = ledger.len(),
        pending = pool.len(),
        "nova-gateway stopped"
    );
    Ok(())
}

/// Commits everything pending as a new block once per `block_time`.
async fn produce_blocks(
    ledger: Arc<MemoryLedger>,
    pool: Arc<MemoryPool>,
    metrics: SharedMetrics,
    block_time: Duration,
) {
    let mut interval = tokio::time::interval(block_time);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let txs = pool.drain(MAX_TXS_PER_BLOCK);
        let count = txs.len() as u64;
        let block_time = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        let height = ledger.commit_block(txs, block_time);

        metrics.blocks_committed_total.inc();
        metrics.transactions_committed_total.inc_by(count);
        metrics.block_height.set(i64::from(height));
        metrics.transactions_in_pool.set(pool.len() as i64);
    }
}

/// Follows pool announcements. Stands in for peer gossip.
async fn relay_announcements(
    mut announcements: broadcast::Receiver<nova_tx::crypto::Hash>,
    pool: Arc<MemoryPool>,
    metrics: SharedMetrics,
) {
    loop {
        match announcements.recv().await {
            Ok(id) => {
                tracing::debug!(%id, "transaction announced");
                metrics.transactions_in_pool.set(pool.len() as i64);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("announcement relay lagged by {} transactions", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Decodes a raw transaction and prints its projection as JSON.
fn decode(args: cli::DecodeArgs) -> Result<()> {
    logging::init_logging(logging::OFFLINE_FILTER, LogFormat::Pretty);

    let tx = service::decode_raw(args.raw_transaction.trim())
        .context("failed to decode raw transaction")?;
    let info = projection::transaction_to_info(&tx);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Generates a keypair and prints it with both derived addresses.
fn keygen() -> Result<()> {
    logging::init_logging(logging::OFFLINE_FILTER, LogFormat::Pretty);

    let keypair = NovaKeypair::generate();
    let public_key = keypair.public_key();
    let out = serde_json::json!({
        "secret_key": hex::encode(keypair.secret_key_bytes()),
        "public_key": public_key.to_hex(),
        "account_address": public_key.account_address().to_string(),
        "validator_address": public_key.validator_address().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("nova-gateway {}", env!("CARGO_PKG_VERSION"));
    println!("protocol     {}", nova_tx::config::PROTOCOL_VERSION);
    println!("tx version   {}", nova_tx::config::TX_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. If a handler cannot be
/// installed its branch never completes and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
