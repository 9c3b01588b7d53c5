//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction core depends on lives here. The
//! gateway, the codec, and the reference collaborators all read from this
//! file so that a constant changes in exactly one place.
//!
//! Values that define the wire format (lengths, discriminants, versions) are
//! consensus-critical: a node that disagrees on any of them computes a
//! different transaction ID for the same logical transaction.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// The full crate-level protocol version string.
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Transaction format version. Bump on any change to the canonical byte
/// layout; validators reject versions they do not know.
pub const TX_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Public (verifying) key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Hash output length in bytes. BLAKE3 produces 32-byte digests.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Length of the key-hash part of an address.
pub const ADDRESS_HASH_LENGTH: usize = 20;

/// Full encoded address length: one type byte plus the key hash.
pub const ADDRESS_LENGTH: usize = 1 + ADDRESS_HASH_LENGTH;

/// Bech32 human-readable prefix for every NOVA address.
pub const ADDRESS_HRP: &str = "nova";

/// Length of the sortition proof carried by a sortition payload.
pub const SORTITION_PROOF_LENGTH: usize = 48;

// ---------------------------------------------------------------------------
// Monetary Parameters
// ---------------------------------------------------------------------------

/// Smallest units per whole NOVA (nano-NOVA).
pub const UNITS_PER_NOVA: u64 = 1_000_000_000;

/// Total supply cap in the smallest unit. No single amount field may exceed it.
pub const MAX_SUPPLY: u64 = 42_000_000 * UNITS_PER_NOVA;

/// Default fee fraction, in parts per million of the transferred value.
/// 100 ppm is 0.01%.
pub const DEFAULT_FEE_FRACTION_PPM: u64 = 100;

/// Default lower bound for a computed fee.
pub const DEFAULT_MIN_FEE: u64 = 1_000;

/// Default upper bound for a computed fee.
pub const DEFAULT_MAX_FEE: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum memo length in bytes. Enough for a payment reference, not
/// enough for a manifesto.
pub const MAX_MEMO_LENGTH: usize = 64;

/// Default capacity of the reference pending pool.
pub const DEFAULT_POOL_SIZE: usize = 10_000;

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Target block time for the reference block-production loop.
pub const BLOCK_TIME: Duration = Duration::from_secs(10);

/// Block time in milliseconds, for CLI defaults.
pub const BLOCK_TIME_MS: u64 = 10_000;

/// Default RPC API port.
pub const DEFAULT_RPC_PORT: u16 = 9741;

/// Default metrics (Prometheus) port.
pub const DEFAULT_METRICS_PORT: u16 = 9742;
