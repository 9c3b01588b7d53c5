//! # CLI Interface
//!
//! Defines the command-line argument structure for `nova-gateway` using
//! `clap` derive. Supports four subcommands: `run`, `decode`, `keygen`,
//! and `version`.

use clap::{Parser, Subcommand};

use nova_tx::config::{
    BLOCK_TIME_MS, DEFAULT_FEE_FRACTION_PPM, DEFAULT_MAX_FEE, DEFAULT_METRICS_PORT,
    DEFAULT_MIN_FEE, DEFAULT_POOL_SIZE, DEFAULT_RPC_PORT,
};

/// NOVA transaction gateway.
///
/// Builds unsigned raw transactions, decodes them, accepts signed ones into
/// the pending pool, and serves committed transactions over JSON-RPC.
#[derive(Parser, Debug)]
#[command(
    name = "nova-gateway",
    about = "NOVA transaction gateway",
    version,
    propagate_version = true
)]
pub struct NovaGatewayCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the gateway over an in-memory ledger and pool.
    Run(RunArgs),
    /// Decode a raw transaction offline and print it as JSON.
    Decode(DecodeArgs),
    /// Generate a fresh Ed25519 keypair and print its addresses.
    Keygen,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the JSON-RPC and REST API.
    #[arg(long, env = "NOVA_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "NOVA_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Proportional fee in parts per million of the amount.
    #[arg(long, env = "NOVA_FEE_FRACTION_PPM", default_value_t = DEFAULT_FEE_FRACTION_PPM)]
    pub fee_fraction_ppm: u64,

    /// Minimum fee in nano-NOVA.
    #[arg(long, env = "NOVA_MIN_FEE", default_value_t = DEFAULT_MIN_FEE)]
    pub min_fee: u64,

    /// Maximum fee in nano-NOVA.
    #[arg(long, env = "NOVA_MAX_FEE", default_value_t = DEFAULT_MAX_FEE)]
    pub max_fee: u64,

    /// Maximum number of pending transactions.
    #[arg(long, env = "NOVA_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Minimum fee the pool accepts, in nano-NOVA.
    #[arg(long, env = "NOVA_POOL_MIN_FEE", default_value_t = 0)]
    pub pool_min_fee: u64,

    /// Interval between locally produced blocks, in milliseconds.
    #[arg(long, env = "NOVA_BLOCK_TIME_MS", default_value_t = BLOCK_TIME_MS)]
    pub block_time_ms: u64,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "NOVA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded raw transaction.
    pub raw_transaction: String,
}
